//! Seam to the hosted telephony platform.
//!
//! Everything here is a thin pass-through: the platform owns call state,
//! recordings and numbers, this crate only lists and reshapes them.

mod access_token;
mod mock;
mod rest_client;
mod upstream;

pub use {
    access_token::{
        AccessTokenClaims, AccessTokenIssuer, DEFAULT_IDENTITY, Grants, IncomingGrant,
        OutgoingGrant, TokenIssuer, VoiceGrant,
    },
    mock::MockTelephony,
    rest_client::{TwilioCredentials, TwilioRestClient},
    upstream::{UpstreamCall, UpstreamRecording},
};

use crate::CoreResult;

use async_trait::async_trait;

/// Public API root of the telephony platform.
pub const API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Filter for a call listing. `from` and `to` are combined with AND upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallQuery {
    /// Only calls placed from this number.
    pub from: Option<String>,
    /// Only calls placed to this number.
    pub to: Option<String>,
    /// Maximum number of calls to return.
    pub limit: usize,
}

impl CallQuery {
    /// Calls originating from `number`.
    pub fn from_number(number: &str, limit: usize) -> Self {
        Self {
            from: Some(number.to_string()),
            to: None,
            limit,
        }
    }

    /// Calls terminating at `number`.
    pub fn to_number(number: &str, limit: usize) -> Self {
        Self {
            from: None,
            to: Some(number.to_string()),
            limit,
        }
    }
}

/// Filter for a recording listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingQuery {
    /// Only recordings of this call.
    pub call_sid: Option<String>,
    /// Maximum number of recordings to return.
    pub limit: usize,
}

/// Read-only access to the platform's call and recording resources.
#[async_trait]
pub trait TelephonyApi: Send + Sync {
    /// Account the resources belong to; part of every media URL.
    fn account_sid(&self) -> &str;

    /// List calls matching `query`, in the platform's default order.
    async fn list_calls(&self, query: CallQuery) -> CoreResult<Vec<UpstreamCall>>;

    /// List recordings matching `query`, in the platform's default order.
    async fn list_recordings(&self, query: RecordingQuery) -> CoreResult<Vec<UpstreamRecording>>;
}

/// Playable MP3 location for a recording, per the platform's public
/// media URL convention.
pub fn recording_media_url(account_sid: &str, recording_sid: &str) -> String {
    format!("{API_BASE_URL}/Accounts/{account_sid}/Recordings/{recording_sid}.mp3")
}
