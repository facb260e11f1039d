use crate::model::{CallDirection, CallRecord, CallStatus, RecordingRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A call resource as the platform returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamCall {
    /// Call identifier.
    pub sid: String,
    /// Destination number.
    #[serde(default)]
    pub to: Option<String>,
    /// Display form of the destination.
    #[serde(default)]
    pub to_formatted: Option<String>,
    /// Originating number.
    #[serde(default)]
    pub from: Option<String>,
    /// When the call was answered or began ringing.
    #[serde(default, deserialize_with = "platform_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the resource was created.
    #[serde(default, deserialize_with = "platform_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    /// Length in seconds, as a decimal string.
    #[serde(default)]
    pub duration: Option<String>,
    /// Call status.
    pub status: CallStatus,
    /// Call direction.
    pub direction: CallDirection,
}

impl UpstreamCall {
    /// Timestamp calls are ordered by: start time, else creation time.
    pub fn sort_time(&self) -> Option<DateTime<Utc>> {
        self.start_time.or(self.date_created)
    }

    /// Reshape into the record served to the dialer.
    pub fn into_record(self) -> CallRecord {
        let start_time = self.sort_time();
        let to = self.to.unwrap_or_default();
        let to_formatted = self
            .to_formatted
            .filter(|formatted| !formatted.is_empty())
            .unwrap_or_else(|| to.clone());

        CallRecord {
            sid: self.sid,
            to,
            from: self.from.unwrap_or_default(),
            to_formatted,
            start_time,
            duration: parse_seconds(self.duration.as_deref()),
            status: self.status,
            direction: self.direction,
        }
    }
}

/// A recording resource as the platform returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamRecording {
    /// Recording identifier.
    pub sid: String,
    /// Call the recording was taken from.
    #[serde(default)]
    pub call_sid: Option<String>,
    /// Length in seconds, as a decimal string.
    #[serde(default)]
    pub duration: Option<String>,
    /// When the resource was created.
    #[serde(default, deserialize_with = "platform_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
}

impl UpstreamRecording {
    /// Reshape into the record served to the dialer.
    pub fn into_record(self, account_sid: &str) -> RecordingRecord {
        let media_url = super::recording_media_url(account_sid, &self.sid);
        RecordingRecord {
            sid: self.sid,
            call_sid: self.call_sid.unwrap_or_default(),
            duration: parse_seconds(self.duration.as_deref()),
            date_created: self.date_created,
            media_url,
        }
    }
}

/// Durations arrive as strings and may be null or negative while a call is
/// still running.
pub(crate) fn parse_seconds(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// The platform emits RFC 2822 dates; RFC 3339 is accepted as well. Values
/// that parse as neither are treated as absent.
fn platform_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();

    let parsed = DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc));

    Ok(parsed)
}
