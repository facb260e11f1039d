//! Telephony client adapter seams.
//!
//! Media transport and signaling live in the platform's client SDK. The
//! dialer only sees these traits and the tagged events the adapter emits.

use crate::{
    CoreResult,
    dialer::DialerEvent,
    model::{CallLogs, Company, RecordingRecord},
};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Custom parameters attached to an outbound call.
///
/// The platform forwards them to the voice webhook as form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallParams {
    /// Number to bridge to.
    #[serde(rename = "To")]
    pub to: String,
    /// Company whose caller ID is presented.
    #[serde(rename = "Company")]
    pub company: Company,
}

/// Server-side data the dialer reads: tokens, call history, recordings.
#[async_trait]
pub trait DialerBackend: Send + Sync {
    /// Capability token scoped to `identity`.
    async fn fetch_token(&self, identity: &str) -> CoreResult<String>;

    /// Recent call history of both companies.
    async fn fetch_call_logs(&self) -> CoreResult<CallLogs>;

    /// Recordings of `call_id`, or the most recent ones.
    async fn fetch_recordings(&self, call_id: Option<&str>) -> CoreResult<Vec<RecordingRecord>>;
}

/// Creates voice devices from capability tokens.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// Bring up a device; its events are delivered on `events`.
    async fn create_device(
        &self,
        token: &str,
        events: mpsc::Sender<DialerEvent>,
    ) -> CoreResult<Box<dyn VoiceDevice>>;
}

/// A registered voice client.
#[async_trait]
pub trait VoiceDevice: Send + Sync {
    /// Start an outbound call. Its events carry `attempt_id`.
    async fn connect(&self, attempt_id: Uuid, params: CallParams)
    -> CoreResult<Box<dyn CallHandle>>;

    /// Refuse an incoming call.
    fn reject_incoming(&self, call_sid: &str);

    /// Unregister and free the device.
    fn destroy(&mut self);
}

/// Handle to an in-flight call.
pub trait CallHandle: Send + Sync {
    /// Terminate the call.
    fn disconnect(&self);
}
