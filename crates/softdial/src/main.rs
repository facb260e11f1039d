//! Softdial: two-number web dialer server.

mod config;
mod error;
mod server;

pub(crate) use error::{AppError, Result as AppResult};

use crate::{
    config::Config,
    server::{AppState, serve},
};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "softdial=debug,softdial_core=debug,tower_http=info";

/// Application entry point.
fn main() {
    init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate_credentials() {
        error!("{}", e);
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config)) {
        error!(error = ?e, "Server exited with error");
        std::process::exit(1);
    }

    info!("Softdial stopped");
}

async fn run(config: Config) -> AppResult<()> {
    let state = AppState::from_config(&config)?;
    serve(&config, state).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
