use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the telephony platform for a call.
///
/// Statuses the platform adds later are kept verbatim in `Other` so a single
/// unfamiliar entry never fails a whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    /// Waiting to be dialed.
    Queued,
    /// Ringing at the far end.
    Ringing,
    /// Answered and connected.
    InProgress,
    /// Finished normally.
    Completed,
    /// Far end was busy.
    Busy,
    /// Could not be placed.
    Failed,
    /// Far end did not pick up.
    NoAnswer,
    /// Hung up before answer.
    Canceled,
    /// Any status not listed above.
    Other(String),
}

impl CallStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Completed => "completed",
            CallStatus::Busy => "busy",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Canceled => "canceled",
            CallStatus::Other(s) => s,
        }
    }
}

impl From<String> for CallStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => CallStatus::Queued,
            "ringing" => CallStatus::Ringing,
            "in-progress" => CallStatus::InProgress,
            "completed" => CallStatus::Completed,
            "busy" => CallStatus::Busy,
            "failed" => CallStatus::Failed,
            "no-answer" => CallStatus::NoAnswer,
            "canceled" => CallStatus::Canceled,
            _ => CallStatus::Other(value),
        }
    }
}

impl From<CallStatus> for String {
    fn from(value: CallStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side originated a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallDirection {
    /// Received from the network.
    Inbound,
    /// Placed through the REST API or a client SDK.
    OutboundApi,
    /// Child leg created by a `<Dial>` verb.
    OutboundDial,
    /// Any direction not listed above.
    Other(String),
}

impl CallDirection {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::OutboundApi => "outbound-api",
            CallDirection::OutboundDial => "outbound-dial",
            CallDirection::Other(s) => s,
        }
    }
}

impl From<String> for CallDirection {
    fn from(value: String) -> Self {
        match value.as_str() {
            "inbound" => CallDirection::Inbound,
            "outbound-api" => CallDirection::OutboundApi,
            "outbound-dial" => CallDirection::OutboundDial,
            _ => CallDirection::Other(value),
        }
    }
}

impl From<CallDirection> for String {
    fn from(value: CallDirection) -> Self {
        value.as_str().to_string()
    }
}

/// A normalized call history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Platform call identifier.
    pub sid: String,
    /// Destination number.
    pub to: String,
    /// Originating number.
    pub from: String,
    /// Display form of `to`; equal to `to` when the platform gives none.
    pub to_formatted: String,
    /// When the call started, or when it was created if it never started.
    pub start_time: Option<DateTime<Utc>>,
    /// Length in seconds.
    pub duration: u64,
    /// Platform status.
    pub status: CallStatus,
    /// Platform direction.
    pub direction: CallDirection,
}

/// Recent call history keyed by company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogs {
    /// Calls to or from company A's number, newest first.
    #[serde(rename = "A")]
    pub a: Vec<CallRecord>,
    /// Calls to or from company B's number, newest first.
    #[serde(rename = "B")]
    pub b: Vec<CallRecord>,
}
