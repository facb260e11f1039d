use crate::{AppResult, server::AppState};

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use softdial_core::RecordingsResponse;
use tracing::{debug, instrument};

/// Query string of `GET /recordings`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordingsParams {
    #[serde(rename = "callId", alias = "callSid")]
    pub(crate) call_id: Option<String>,
}

/// `GET /recordings`: recordings for one call, or the most recent ones.
#[instrument(skip(state))]
pub(crate) async fn list_recordings(
    State(state): State<AppState>,
    Query(params): Query<RecordingsParams>,
) -> AppResult<Json<RecordingsResponse>> {
    let recordings = state
        .recordings
        .fetch_recordings(params.call_id.as_deref())
        .await?;

    debug!(count = recordings.len(), "Recordings served");

    Ok(Json(RecordingsResponse { recordings }))
}
