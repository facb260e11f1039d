use axum::{Form, http::StatusCode};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields of the platform's recording status callback that get logged.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordingStatusForm {
    #[serde(rename = "RecordingSid")]
    recording_sid: Option<String>,
    #[serde(rename = "CallSid")]
    call_sid: Option<String>,
    #[serde(rename = "RecordingStatus")]
    status: Option<String>,
    #[serde(rename = "RecordingDuration")]
    duration: Option<String>,
}

/// `POST /recording-status`: acknowledge a finished recording.
#[instrument(skip_all)]
pub(crate) async fn recording_status(Form(form): Form<RecordingStatusForm>) -> StatusCode {
    info!(
        recording_sid = form.recording_sid.as_deref().unwrap_or_default(),
        call_sid = form.call_sid.as_deref().unwrap_or_default(),
        status = form.status.as_deref().unwrap_or_default(),
        duration = form.duration.as_deref().unwrap_or_default(),
        "Recording status received"
    );

    StatusCode::NO_CONTENT
}
