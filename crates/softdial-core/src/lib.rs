//! Softdial Core Library
//!
//! Two-number web dialer core: call history and recording listings from the
//! hosted telephony platform, client access tokens, inbound routing markup,
//! and the dialer session state machine.
//!
//! # Example
//!
//! ```no_run
//! use softdial_core::{CompanyNumbers, CoreResult, build_routing_response};
//!
//! fn main() -> CoreResult<()> {
//!     let numbers = CompanyNumbers::new("+15550000001", "+15550000002");
//!     let twiml = build_routing_response("+15551234567", Some("B"), &numbers)?;
//!
//!     println!("{}", twiml);
//!     Ok(())
//! }
//! ```

mod dialer;
mod error;
mod fetch;
mod model;
mod routing;
mod telephony;

pub use {
    dialer::{
        BackendClient, CallEvent, CallHandle, CallParams, ConnectionStatus, DeviceConnector,
        DeviceEvent, Dialer, DialerBackend, DialerCommand, DialerEvent, MOCK_ANSWER_DELAY,
        MOCK_HANGUP_DELAY, MockDeviceConnector, MockVoiceDevice, SessionState, VoiceDevice,
        device_error,
    },
    error::{DialerError, Result as CoreResult},
    fetch::{
        CALLS_PER_DIRECTION, CallLogFetcher, MAX_CALLS_PER_COMPANY, RECENT_RECORDINGS_LIMIT,
        RECORDINGS_PER_CALL_LIMIT, RecordingFetcher, merge_call_history,
    },
    model::{
        CallDirection, CallLogs, CallRecord, CallStatus, Company, CompanyNumbers, ErrorResponse,
        RecordingRecord, RecordingsResponse, TokenResponse,
    },
    routing::{
        RECORDING_STATUS_CALLBACK_PATH, TWIML_CONTENT_TYPE, build_routing_response,
        mock_routing_response, reject_response,
    },
    telephony::{
        API_BASE_URL, AccessTokenClaims, AccessTokenIssuer, CallQuery, DEFAULT_IDENTITY, Grants,
        IncomingGrant, MockTelephony, OutgoingGrant, RecordingQuery, TelephonyApi, TokenIssuer,
        TwilioCredentials, TwilioRestClient, UpstreamCall, UpstreamRecording, VoiceGrant,
        recording_media_url,
    },
};

#[cfg(test)]
mod tests;
