use crate::{
    CoreResult,
    model::RecordingRecord,
    telephony::{RecordingQuery, TelephonyApi},
};

use std::sync::Arc;

use tracing::{info, instrument};

/// Recordings returned for a single call.
pub const RECORDINGS_PER_CALL_LIMIT: usize = 20;

/// Recordings returned when no call is given.
pub const RECENT_RECORDINGS_LIMIT: usize = 50;

/// Lists recordings with playable media URLs.
///
/// Media bytes are never fetched here; the browser streams them from the
/// platform directly.
pub struct RecordingFetcher {
    telephony: Arc<dyn TelephonyApi>,
}

impl RecordingFetcher {
    /// Create a fetcher over `telephony`.
    pub fn new(telephony: Arc<dyn TelephonyApi>) -> Self {
        Self { telephony }
    }

    /// Fetch recordings of `call_id`, or the most recent ones account-wide.
    ///
    /// An empty `call_id` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the platform cannot be queried.
    #[instrument(skip(self))]
    pub async fn fetch_recordings(&self, call_id: Option<&str>) -> CoreResult<Vec<RecordingRecord>> {
        let call_id = call_id.map(str::trim).filter(|id| !id.is_empty());

        let query = match call_id {
            Some(id) => RecordingQuery {
                call_sid: Some(id.to_string()),
                limit: RECORDINGS_PER_CALL_LIMIT,
            },
            None => RecordingQuery {
                call_sid: None,
                limit: RECENT_RECORDINGS_LIMIT,
            },
        };
        let limit = query.limit;

        let account_sid = self.telephony.account_sid().to_string();
        let recordings: Vec<RecordingRecord> = self
            .telephony
            .list_recordings(query)
            .await?
            .into_iter()
            .map(|rec| rec.into_record(&account_sid))
            .filter(|rec| call_id.is_none_or(|id| rec.call_sid == id))
            .take(limit)
            .collect();

        info!(count = recordings.len(), "Recordings fetched");

        Ok(recordings)
    }
}
