use crate::{
    CoreResult, DialerError,
    dialer::DialerBackend,
    model::{CallLogs, ErrorResponse, RecordingRecord, RecordingsResponse, TokenResponse},
};

use std::{panic::Location, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// HTTP client for the dialer's own server endpoints.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the server at `base_url`.
    #[track_caller]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> CoreResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("GET {} failed: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("GET {} returned status {}", path, status),
            };
            return Err(DialerError::UpstreamUnavailable {
                reason,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("Malformed {} response: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

#[async_trait]
impl DialerBackend for BackendClient {
    #[instrument(skip(self))]
    async fn fetch_token(&self, identity: &str) -> CoreResult<String> {
        let body: TokenResponse = self
            .get_json("/token", &[("identity", identity)])
            .await
            .map_err(|e| DialerError::TokenIssuanceFailure {
                reason: e.user_message(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!("Token received");

        Ok(body.token)
    }

    #[instrument(skip(self))]
    async fn fetch_call_logs(&self) -> CoreResult<CallLogs> {
        self.get_json("/calls", &[]).await
    }

    #[instrument(skip(self))]
    async fn fetch_recordings(&self, call_id: Option<&str>) -> CoreResult<Vec<RecordingRecord>> {
        let params: Vec<(&str, &str)> = call_id.map(|id| ("callId", id)).into_iter().collect();
        let body: RecordingsResponse = self.get_json("/recordings", &params).await?;
        Ok(body.recordings)
    }
}
