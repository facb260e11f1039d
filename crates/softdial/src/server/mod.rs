mod app_state;
mod handlers;

pub(crate) use app_state::AppState;

use crate::{AppError, AppResult, config::Config};

use std::{panic::Location, path::Path};

use axum::{
    Router,
    routing::{get, post},
};
use error_location::ErrorLocation;
use softdial_core::RECORDING_STATUS_CALLBACK_PATH;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, instrument};

/// Build the HTTP router. Unmatched paths fall through to `static_dir`
/// when one is given.
pub(crate) fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/calls", get(handlers::list_calls))
        .route("/recordings", get(handlers::list_recordings))
        .route("/token", get(handlers::issue_token))
        .route("/voice", post(handlers::route_call))
        .route(RECORDING_STATUS_CALLBACK_PATH, post(handlers::recording_status));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
#[instrument(skip_all)]
pub(crate) async fn serve(config: &Config, state: AppState) -> AppResult<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;

    info!(address = %address, mock = config.behaviour.mock, "Softdial listening");

    let app = router(state, config.server.static_dir.as_deref());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::ServerError {
            reason: format!("Server stopped: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }

    info!("Shutdown signal received");
}
