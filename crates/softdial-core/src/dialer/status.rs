/// Connection status of the dialer session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No call in progress.
    #[default]
    Idle,
    /// Waiting for a capability token.
    RequestingToken,
    /// Device created and able to place calls.
    Ready {
        /// Whether the device has reported registration.
        registered: bool,
    },
    /// Outbound call placed, not yet answered.
    Dialing {
        /// Number being dialed.
        target: String,
    },
    /// Call answered.
    InCall,
    /// Last call abandoned before answer.
    Canceled,
    /// A failure was reported; cleared by acknowledgment.
    Error {
        /// Failure description.
        message: String,
    },
}

impl ConnectionStatus {
    /// Text shown in the status banner.
    pub fn label(&self, mock: bool) -> String {
        match self {
            ConnectionStatus::Idle => "Idle".to_string(),
            ConnectionStatus::RequestingToken => "Requesting token...".to_string(),
            ConnectionStatus::Ready { .. } if mock => "Mock mode: ready".to_string(),
            ConnectionStatus::Ready { registered: true } => "Registered".to_string(),
            ConnectionStatus::Ready { registered: false } => "Ready".to_string(),
            ConnectionStatus::Dialing { target } if mock => format!("Mock: calling {}", target),
            ConnectionStatus::Dialing { .. } => "Calling...".to_string(),
            ConnectionStatus::InCall if mock => "Mock: in call".to_string(),
            ConnectionStatus::InCall => "In call".to_string(),
            ConnectionStatus::Canceled => "Canceled".to_string(),
            ConnectionStatus::Error { message } => format!("Error: {}", message),
        }
    }

    /// Whether a call is being set up or is up.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::Dialing { .. } | ConnectionStatus::InCall
        )
    }
}
