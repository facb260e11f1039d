use crate::{
    CoreResult,
    dialer::{
        CallEvent, CallHandle, CallParams, DeviceConnector, DeviceEvent, DialerEvent, VoiceDevice,
    },
};

use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Delay before a mock call is answered.
pub const MOCK_ANSWER_DELAY: Duration = Duration::from_millis(400);

/// Delay, from placement, before a mock call ends on its own.
pub const MOCK_HANGUP_DELAY: Duration = Duration::from_millis(1800);

/// Creates [`MockVoiceDevice`]s; never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDeviceConnector;

#[async_trait]
impl DeviceConnector for MockDeviceConnector {
    #[instrument(skip(self, token, events))]
    async fn create_device(
        &self,
        token: &str,
        events: mpsc::Sender<DialerEvent>,
    ) -> CoreResult<Box<dyn VoiceDevice>> {
        debug!(token_len = token.len(), "Creating mock voice device");

        if events
            .send(DialerEvent::Device(DeviceEvent::Registered))
            .await
            .is_err()
        {
            warn!("Dialer event channel closed before registration");
        }

        Ok(Box::new(MockVoiceDevice { events }))
    }
}

/// Voice device that plays a fixed answer-then-hangup timeline per call.
pub struct MockVoiceDevice {
    events: mpsc::Sender<DialerEvent>,
}

#[async_trait]
impl VoiceDevice for MockVoiceDevice {
    #[instrument(skip(self))]
    async fn connect(
        &self,
        attempt_id: Uuid,
        params: CallParams,
    ) -> CoreResult<Box<dyn CallHandle>> {
        let events = self.events.clone();

        let timeline = tokio::spawn(async move {
            tokio::time::sleep(MOCK_ANSWER_DELAY).await;
            let accept = DialerEvent::Call {
                attempt_id,
                event: CallEvent::Accept,
            };
            if events.send(accept).await.is_err() {
                return;
            }

            tokio::time::sleep(MOCK_HANGUP_DELAY.saturating_sub(MOCK_ANSWER_DELAY)).await;
            let _ = events
                .send(DialerEvent::Call {
                    attempt_id,
                    event: CallEvent::Disconnect,
                })
                .await;
        });

        info!(attempt_id = %attempt_id, to = %params.to, "Mock call placed");

        Ok(Box::new(MockCallHandle {
            attempt_id,
            events: self.events.clone(),
            timeline,
        }))
    }

    fn reject_incoming(&self, call_sid: &str) {
        debug!(call_sid = %call_sid, "Mock device rejected incoming call");
    }

    fn destroy(&mut self) {
        debug!("Mock voice device destroyed");
    }
}

struct MockCallHandle {
    attempt_id: Uuid,
    events: mpsc::Sender<DialerEvent>,
    timeline: JoinHandle<()>,
}

impl CallHandle for MockCallHandle {
    fn disconnect(&self) {
        self.timeline.abort();

        let event = DialerEvent::Call {
            attempt_id: self.attempt_id,
            event: CallEvent::Disconnect,
        };
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => match Handle::try_current() {
                Ok(runtime) => {
                    let events = self.events.clone();
                    runtime.spawn(async move {
                        let _ = events.send(event).await;
                    });
                }
                Err(e) => {
                    warn!(attempt_id = %self.attempt_id, error = %e, "Mock disconnect dropped, no runtime");
                }
            },
            Err(TrySendError::Closed(_)) => {
                debug!(attempt_id = %self.attempt_id, "Dialer gone, mock disconnect not delivered");
            }
        }
    }
}

impl Drop for MockCallHandle {
    fn drop(&mut self) {
        self.timeline.abort();
    }
}
