//! Single-session dialer view model.
//!
//! Tracks identity, selected company, target number and connection status,
//! and drives the voice device and the history endpoints. All mutation goes
//! through `&mut self`, so a session is owned by exactly one task.

use crate::{
    CoreResult, DialerError,
    dialer::{
        CallEvent, CallHandle, CallParams, ConnectionStatus, DeviceConnector, DeviceEvent,
        DialerBackend, DialerCommand, DialerEvent, MockDeviceConnector, VoiceDevice,
    },
    model::{CallLogs, Company, RecordingRecord},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 32;

struct ActiveCall {
    attempt_id: Uuid,
    answered: bool,
    handle: Box<dyn CallHandle>,
}

/// Snapshot of the session's user-visible state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Agent identity the device registered as.
    pub identity: String,
    /// Company selected for the last call.
    pub company: Company,
    /// Number entered for the last call.
    pub target_number: String,
    /// Current connection status.
    pub connection_status: ConnectionStatus,
    /// Whether a call handle is held.
    pub has_active_call: bool,
}

/// Dialer session state machine.
///
/// ```text
/// Idle -> RequestingToken -> Ready -> Dialing -> InCall -> Idle
///                 any state -> Error -> Idle (on acknowledgment)
/// ```
///
/// A call left in `Dialing` by a silent adapter stays there; no timeout is
/// applied. While a call handle is held the status never reads `Idle` or
/// `Ready`: history failures are only logged, and acknowledging a device
/// error returns to the call's own status.
pub struct Dialer {
    session_id: Uuid,
    mock: bool,
    identity: String,
    company: Company,
    target_number: String,
    backend: Arc<dyn DialerBackend>,
    connector: Arc<dyn DeviceConnector>,
    device: Option<Box<dyn VoiceDevice>>,
    active_call: Option<ActiveCall>,
    status_tx: watch::Sender<ConnectionStatus>,
    event_tx: mpsc::Sender<DialerEvent>,
    event_rx: mpsc::Receiver<DialerEvent>,
    logs: CallLogs,
    loading_logs: bool,
    recordings: Vec<RecordingRecord>,
}

impl Dialer {
    /// Create a session using a real device connector.
    pub fn new(backend: Arc<dyn DialerBackend>, connector: Arc<dyn DeviceConnector>) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Idle);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            session_id: Uuid::new_v4(),
            mock: false,
            identity: String::new(),
            company: Company::A,
            target_number: String::new(),
            backend,
            connector,
            device: None,
            active_call: None,
            status_tx,
            event_tx,
            event_rx,
            logs: CallLogs::default(),
            loading_logs: false,
            recordings: Vec::new(),
        }
    }

    /// Create an offline session backed by [`MockDeviceConnector`].
    pub fn mock(backend: Arc<dyn DialerBackend>) -> Self {
        let mut dialer = Self::new(backend, Arc::new(MockDeviceConnector));
        dialer.mock = true;
        dialer
    }

    /// Watch connection status changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status_tx.borrow().clone()
    }

    /// Current status banner text.
    pub fn status_label(&self) -> String {
        self.status_tx.borrow().label(self.mock)
    }

    /// Whether the session runs against the mock device.
    pub fn is_mock(&self) -> bool {
        self.mock
    }

    /// Whether calls can be placed (a device exists and none is active).
    pub fn can_place_call(&self) -> bool {
        self.device.is_some() && self.active_call.is_none() && self.status_allows_call()
    }

    /// Snapshot of the user-visible session state.
    pub fn session(&self) -> SessionState {
        SessionState {
            identity: self.identity.clone(),
            company: self.company,
            target_number: self.target_number.clone(),
            connection_status: self.status(),
            has_active_call: self.active_call.is_some(),
        }
    }

    /// Last loaded call history.
    pub fn logs(&self) -> &CallLogs {
        &self.logs
    }

    /// Whether a history refresh is in flight.
    pub fn is_loading_logs(&self) -> bool {
        self.loading_logs
    }

    /// Last loaded recordings.
    pub fn recordings(&self) -> &[RecordingRecord] {
        &self.recordings
    }

    /// Request a token for `identity` and create the voice device.
    ///
    /// On failure the session moves to `Error` and stays there until
    /// acknowledged; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns the token or device failure that moved the session to `Error`.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn initialize(&mut self, identity: &str) -> CoreResult<()> {
        if self.active_call.is_some() || self.status().is_busy() {
            warn!("Initialize ignored while a call is in progress");
            return Ok(());
        }

        self.identity = identity.to_string();
        self.set_status(ConnectionStatus::RequestingToken);

        let token = match self.backend.fetch_token(identity).await {
            Ok(token) => token,
            Err(e) => {
                error!(error = ?e, "Token request failed");
                self.fail(&e);
                return Err(e);
            }
        };

        let device = match self
            .connector
            .create_device(&token, self.event_tx.clone())
            .await
        {
            Ok(device) => device,
            Err(e) => {
                error!(error = ?e, "Voice device creation failed");
                self.fail(&e);
                return Err(e);
            }
        };

        if let Some(mut previous) = self.device.replace(device) {
            previous.destroy();
        }
        self.set_status(ConnectionStatus::Ready { registered: false });

        info!(identity = %identity, mock = self.mock, "Dialer ready");

        Ok(())
    }

    /// Place a call to `target_number` for `company`.
    ///
    /// An empty target is silently declined, as is any call while another is
    /// dialing or up, or before a device exists. Returns the attempt id when
    /// a call was started.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the adapter refuses to start the call.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn place_call(
        &mut self,
        target_number: &str,
        company: Company,
    ) -> CoreResult<Option<Uuid>> {
        let target_number = target_number.trim();
        if target_number.is_empty() {
            debug!("Empty target number, call not placed");
            return Ok(None);
        }
        if !self.can_place_call() {
            warn!(status = ?self.status(), "Call not placed in current state");
            return Ok(None);
        }

        self.target_number = target_number.to_string();
        self.company = company;

        let attempt_id = Uuid::new_v4();
        let params = CallParams {
            to: target_number.to_string(),
            company,
        };

        self.set_status(ConnectionStatus::Dialing {
            target: target_number.to_string(),
        });

        let result = match self.device.as_ref() {
            Some(device) => device.connect(attempt_id, params).await,
            None => Err(device_error("No voice device")),
        };

        match result {
            Ok(handle) => {
                self.active_call = Some(ActiveCall {
                    attempt_id,
                    answered: false,
                    handle,
                });
                info!(attempt_id = %attempt_id, company = %company, "Call placed");
                Ok(Some(attempt_id))
            }
            Err(e) => {
                error!(attempt_id = %attempt_id, error = ?e, "Call placement failed");
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Ask the adapter to end the active call. No-op without one.
    ///
    /// The status changes when the adapter reports the disconnect.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn hang_up(&mut self) {
        match &self.active_call {
            Some(call) => {
                call.handle.disconnect();
                info!(attempt_id = %call.attempt_id, "Hang up requested");
            }
            None => debug!("Hang up with no active call"),
        }
    }

    /// Dismiss an error, returning to `Idle`, or to the active call's
    /// status when a call is still up.
    pub fn acknowledge_error(&mut self) {
        if !matches!(self.status(), ConnectionStatus::Error { .. }) {
            return;
        }

        let next = match &self.active_call {
            Some(call) if call.answered => ConnectionStatus::InCall,
            Some(_) => ConnectionStatus::Dialing {
                target: self.target_number.clone(),
            },
            None => ConnectionStatus::Idle,
        };
        self.set_status(next);
    }

    /// Apply an adapter event.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn handle_event(&mut self, event: DialerEvent) {
        match event {
            DialerEvent::Device(event) => self.handle_device_event(event),
            DialerEvent::Call { attempt_id, event } => {
                let is_current = self
                    .active_call
                    .as_ref()
                    .is_some_and(|call| call.attempt_id == attempt_id);
                if !is_current {
                    debug!(attempt_id = %attempt_id, ?event, "Event for finished call ignored");
                    return;
                }
                self.handle_call_event(event);
            }
        }
    }

    /// Wait for the next adapter event and apply it.
    ///
    /// Returns `false` only if the event channel is closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Refresh call history. A failure moves the session to `Error` (or is
    /// only logged during a call) and leaves the previous history untouched.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the server cannot provide history.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn load_logs(&mut self) -> CoreResult<()> {
        self.loading_logs = true;
        let result = self.backend.fetch_call_logs().await;
        self.loading_logs = false;

        match result {
            Ok(logs) => {
                self.logs = logs;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Load recordings of `call_id`, or the most recent ones.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the server cannot provide recordings.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn load_recordings(&mut self, call_id: Option<&str>) -> CoreResult<()> {
        match self.backend.fetch_recordings(call_id).await {
            Ok(recordings) => {
                self.recordings = recordings;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Hang up any active call and release the device.
    pub fn teardown(&mut self) {
        if let Some(call) = self.active_call.take() {
            call.handle.disconnect();
        }
        if let Some(mut device) = self.device.take() {
            device.destroy();
        }
        self.set_status(ConnectionStatus::Idle);
        info!(session_id = %self.session_id, "Dialer torn down");
    }

    /// Run the session until `Shutdown` or until `commands` closes.
    ///
    /// Command failures are logged; they are already reflected in the status.
    #[instrument(skip(self, commands), fields(session_id = %self.session_id))]
    pub async fn run(mut self, mut commands: mpsc::Receiver<DialerCommand>) {
        info!("Dialer session started");

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else {
                        info!("Command channel closed");
                        break;
                    };
                    if matches!(cmd, DialerCommand::Shutdown) {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.execute(cmd).await {
                        error!(error = ?e, "Dialer command failed");
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
            }
        }

        self.teardown();
    }

    async fn execute(&mut self, cmd: DialerCommand) -> CoreResult<()> {
        match cmd {
            DialerCommand::Initialize { identity } => self.initialize(&identity).await,
            DialerCommand::PlaceCall { target, company } => {
                self.place_call(&target, company).await.map(|_| ())
            }
            DialerCommand::HangUp => {
                self.hang_up();
                Ok(())
            }
            DialerCommand::AcknowledgeError => {
                self.acknowledge_error();
                Ok(())
            }
            DialerCommand::LoadLogs => self.load_logs().await,
            DialerCommand::LoadRecordings { call_id } => {
                self.load_recordings(call_id.as_deref()).await
            }
            DialerCommand::Shutdown => Ok(()),
        }
    }

    fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Registered => {
                if matches!(self.status(), ConnectionStatus::Ready { .. }) {
                    self.set_status(ConnectionStatus::Ready { registered: true });
                }
                info!("Voice device registered");
            }
            DeviceEvent::Error { message } => {
                warn!(message = %message, "Voice device error");
                self.set_status(ConnectionStatus::Error { message });
            }
            DeviceEvent::Incoming { call_sid, from } => {
                // Tokens carry no incoming grant; anything that still rings is refused.
                if let Some(device) = &self.device {
                    device.reject_incoming(&call_sid);
                }
                info!(call_sid = %call_sid, from = %from, "Incoming call rejected");
            }
        }
    }

    fn handle_call_event(&mut self, event: CallEvent) {
        match event {
            CallEvent::Accept => {
                if let Some(call) = self.active_call.as_mut() {
                    call.answered = true;
                }
                self.set_status(ConnectionStatus::InCall);
                info!("Call answered");
            }
            CallEvent::Disconnect => {
                self.active_call = None;
                self.set_status(ConnectionStatus::Idle);
                info!("Call disconnected");
            }
            CallEvent::Cancel => {
                self.active_call = None;
                self.set_status(ConnectionStatus::Canceled);
                info!("Call canceled");
            }
            CallEvent::Error { message } => {
                self.active_call = None;
                warn!(message = %message, "Call failed");
                self.set_status(ConnectionStatus::Error { message });
            }
        }
    }

    fn status_allows_call(&self) -> bool {
        matches!(
            self.status(),
            ConnectionStatus::Ready { .. } | ConnectionStatus::Idle | ConnectionStatus::Canceled
        )
    }

    fn fail(&mut self, error: &DialerError) {
        if let Some(call) = &self.active_call {
            warn!(
                attempt_id = %call.attempt_id,
                error = %error.user_message(),
                "Failure during active call, status kept"
            );
            return;
        }
        self.set_status(ConnectionStatus::Error {
            message: error.user_message(),
        });
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        debug!(status = ?status, "Status changed");
        self.status_tx.send_replace(status);
    }
}

/// Build a `DeviceError` for adapters reporting a failed operation.
#[track_caller]
pub fn device_error(reason: impl Into<String>) -> DialerError {
    DialerError::DeviceError {
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}
