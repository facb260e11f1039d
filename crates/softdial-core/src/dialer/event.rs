use crate::model::Company;

use uuid::Uuid;

/// Events raised by the voice device itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The device registered with the platform.
    Registered,
    /// The device reported a failure.
    Error {
        /// Failure description from the adapter.
        message: String,
    },
    /// Someone is calling this client.
    Incoming {
        /// Platform identifier of the incoming call.
        call_sid: String,
        /// Caller's number or client identity.
        from: String,
    },
}

/// Lifecycle events of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    /// The far end answered.
    Accept,
    /// The call ended after being set up.
    Disconnect,
    /// The call was abandoned before it was answered.
    Cancel,
    /// The call failed.
    Error {
        /// Failure description from the adapter.
        message: String,
    },
}

/// Everything the dialer reacts to besides user commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialerEvent {
    /// Device-level event.
    Device(DeviceEvent),
    /// Event of the call placed as `attempt_id`.
    Call {
        /// Attempt the event belongs to; events of finished attempts are ignored.
        attempt_id: Uuid,
        /// What happened.
        event: CallEvent,
    },
}

/// User actions driving a dialer running its own event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialerCommand {
    /// Request a token for `identity` and bring the device up.
    Initialize {
        /// Agent identity.
        identity: String,
    },
    /// Place a call to `target` on behalf of `company`.
    PlaceCall {
        /// Number to dial.
        target: String,
        /// Company whose caller ID is used.
        company: Company,
    },
    /// Hang up the active call, if any.
    HangUp,
    /// Dismiss an error and return to idle.
    AcknowledgeError,
    /// Refresh call history.
    LoadLogs,
    /// Load recordings, optionally of a single call.
    LoadRecordings {
        /// Call to restrict to.
        call_id: Option<String>,
    },
    /// Leave the event loop and release the device.
    Shutdown,
}
