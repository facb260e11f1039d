use crate::{AppResult, server::AppState};

use axum::{Json, extract::State};
use softdial_core::CallLogs;
use tracing::{debug, instrument};

/// `GET /calls`: recent call history for both companies.
#[instrument(skip(state))]
pub(crate) async fn list_calls(State(state): State<AppState>) -> AppResult<Json<CallLogs>> {
    let logs = state.call_logs.fetch_call_logs(&state.numbers).await?;

    debug!(a = logs.a.len(), b = logs.b.len(), "Call logs served");

    Ok(Json(logs))
}
