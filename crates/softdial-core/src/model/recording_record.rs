use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A call recording with a playable media URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingRecord {
    /// Platform recording identifier.
    pub sid: String,
    /// Call the recording belongs to.
    pub call_sid: String,
    /// Length in seconds.
    pub duration: u64,
    /// When the platform created the recording.
    pub date_created: Option<DateTime<Utc>>,
    /// Location the browser can stream the recording from.
    pub media_url: String,
}
