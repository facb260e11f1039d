use crate::{
    CoreResult,
    model::{CallDirection, CallStatus, CompanyNumbers},
    telephony::{CallQuery, RecordingQuery, TelephonyApi, UpstreamCall, UpstreamRecording},
};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

const MOCK_ACCOUNT_SID: &str = "ACmock";

/// Offline stand-in for the platform, serving fixed fixtures.
///
/// Holds one completed outbound call from company A and one completed
/// inbound call to company B, plus a single recording of the A call.
pub struct MockTelephony {
    calls: Vec<UpstreamCall>,
    recordings: Vec<UpstreamRecording>,
}

impl MockTelephony {
    /// Build fixtures around the configured company numbers.
    pub fn new(numbers: &CompanyNumbers) -> Self {
        let now = Utc::now();

        let calls = vec![
            UpstreamCall {
                sid: "CA1".to_string(),
                to: Some("+15551230001".to_string()),
                to_formatted: Some("+1 555 123 0001".to_string()),
                from: Some(numbers.a.clone()),
                start_time: Some(now),
                date_created: Some(now),
                duration: Some("60".to_string()),
                status: CallStatus::Completed,
                direction: CallDirection::OutboundApi,
            },
            UpstreamCall {
                sid: "CB1".to_string(),
                to: Some(numbers.b.clone()),
                to_formatted: None,
                from: Some("+15558880001".to_string()),
                start_time: Some(now),
                date_created: Some(now),
                duration: Some("45".to_string()),
                status: CallStatus::Completed,
                direction: CallDirection::Inbound,
            },
        ];

        let recordings = vec![UpstreamRecording {
            sid: "RECA".to_string(),
            call_sid: Some("CA1".to_string()),
            duration: Some("60".to_string()),
            date_created: Some(now),
        }];

        Self { calls, recordings }
    }
}

#[async_trait]
impl TelephonyApi for MockTelephony {
    fn account_sid(&self) -> &str {
        MOCK_ACCOUNT_SID
    }

    async fn list_calls(&self, query: CallQuery) -> CoreResult<Vec<UpstreamCall>> {
        let calls: Vec<UpstreamCall> = self
            .calls
            .iter()
            .filter(|call| {
                query
                    .from
                    .as_deref()
                    .is_none_or(|from| call.from.as_deref() == Some(from))
                    && query
                        .to
                        .as_deref()
                        .is_none_or(|to| call.to.as_deref() == Some(to))
            })
            .take(query.limit)
            .cloned()
            .collect();

        debug!(count = calls.len(), "Mock calls listed");

        Ok(calls)
    }

    async fn list_recordings(&self, query: RecordingQuery) -> CoreResult<Vec<UpstreamRecording>> {
        let recordings = self
            .recordings
            .iter()
            .filter(|rec| {
                query
                    .call_sid
                    .as_deref()
                    .is_none_or(|sid| rec.call_sid.as_deref() == Some(sid))
            })
            .take(query.limit)
            .cloned()
            .collect();

        Ok(recordings)
    }
}
