use error_location::ErrorLocation;
use thiserror::Error;

/// Dialer and telephony errors with source location tracking.
#[derive(Error, Debug)]
pub enum DialerError {
    /// The telephony platform could not be reached or rejected the request.
    #[error("Telephony platform unavailable: {reason} {location}")]
    UpstreamUnavailable {
        /// Description of the upstream failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A client access token could not be issued.
    #[error("Token issuance failed: {reason} {location}")]
    TokenIssuanceFailure {
        /// Description of the issuance failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Caller supplied input that cannot be acted on.
    #[error("Invalid input: {reason} {location}")]
    InvalidInput {
        /// Description of the rejected input.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The telephony client adapter reported a failure.
    #[error("Voice device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl DialerError {
    /// Message suitable for the dialer's status banner.
    pub fn user_message(&self) -> String {
        match self {
            DialerError::UpstreamUnavailable { reason, .. }
            | DialerError::TokenIssuanceFailure { reason, .. }
            | DialerError::InvalidInput { reason, .. }
            | DialerError::DeviceError { reason, .. } => reason.clone(),
        }
    }

    /// Whether the failure came from the telephony platform side.
    ///
    /// Token issuance failures are surfaced exactly like unreachable upstreams.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DialerError::UpstreamUnavailable { .. } | DialerError::TokenIssuanceFailure { .. }
        )
    }
}

/// Result type alias using [`DialerError`].
pub type Result<T> = std::result::Result<T, DialerError>;
