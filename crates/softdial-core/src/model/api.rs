use crate::model::RecordingRecord;

use serde::{Deserialize, Serialize};

/// Body of `GET /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque capability token for the voice client.
    pub token: String,
}

/// Body of `GET /recordings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingsResponse {
    /// Recordings, in the platform's order.
    pub recordings: Vec<RecordingRecord>,
}

/// Body of any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}
