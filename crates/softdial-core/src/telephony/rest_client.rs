use crate::{
    CoreResult, DialerError,
    telephony::{
        API_BASE_URL, CallQuery, RecordingQuery, TelephonyApi, UpstreamCall, UpstreamRecording,
    },
};

use std::{panic::Location, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

/// Account credentials for the platform's REST API.
///
/// Requests authenticate with an API key rather than the account auth token.
#[derive(Clone)]
pub struct TwilioCredentials {
    /// Account identifier (`AC...`).
    pub account_sid: String,
    /// API key identifier (`SK...`).
    pub api_key_sid: String,
    /// API key secret.
    pub api_key_secret: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("api_key_sid", &self.api_key_sid)
            .field("api_key_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CallsPage {
    #[serde(default)]
    calls: Vec<UpstreamCall>,
}

#[derive(Deserialize)]
struct RecordingsPage {
    #[serde(default)]
    recordings: Vec<UpstreamRecording>,
}

/// REST client for the platform's call and recording list endpoints.
pub struct TwilioRestClient {
    http: reqwest::Client,
    base_url: String,
    credentials: TwilioCredentials,
}

impl TwilioRestClient {
    /// Create a client whose requests give up after `timeout`.
    #[track_caller]
    pub fn new(credentials: TwilioCredentials, timeout: Duration) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            http,
            base_url: API_BASE_URL.to_string(),
            credentials,
        })
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> CoreResult<T> {
        let url = format!(
            "{}/Accounts/{}/{}",
            self.base_url, self.credentials.account_sid, resource
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(
                &self.credentials.api_key_sid,
                Some(&self.credentials.api_key_secret),
            )
            .query(params)
            .send()
            .await
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("Request to {} failed: {}", resource, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DialerError::UpstreamUnavailable {
                reason: format!("Credentials rejected by telephony platform ({})", status),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if !status.is_success() {
            return Err(DialerError::UpstreamUnavailable {
                reason: format!("GET {} returned status {}", resource, status),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DialerError::UpstreamUnavailable {
                reason: format!("Malformed {} response: {}", resource, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

#[async_trait]
impl TelephonyApi for TwilioRestClient {
    fn account_sid(&self) -> &str {
        &self.credentials.account_sid
    }

    #[instrument(skip(self))]
    async fn list_calls(&self, query: CallQuery) -> CoreResult<Vec<UpstreamCall>> {
        let mut params = vec![("PageSize", query.limit.to_string())];
        if let Some(from) = query.from {
            params.push(("From", from));
        }
        if let Some(to) = query.to {
            params.push(("To", to));
        }

        let page: CallsPage = self.get_json("Calls.json", &params).await?;
        let mut calls = page.calls;
        calls.truncate(query.limit);

        debug!(count = calls.len(), "Calls listed");

        Ok(calls)
    }

    #[instrument(skip(self))]
    async fn list_recordings(&self, query: RecordingQuery) -> CoreResult<Vec<UpstreamRecording>> {
        let mut params = vec![("PageSize", query.limit.to_string())];
        if let Some(call_sid) = query.call_sid {
            params.push(("CallSid", call_sid));
        }

        let page: RecordingsPage = self.get_json("Recordings.json", &params).await?;
        let mut recordings = page.recordings;
        recordings.truncate(query.limit);

        debug!(count = recordings.len(), "Recordings listed");

        Ok(recordings)
    }
}
