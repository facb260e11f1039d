mod backend_client;
mod device;
#[allow(clippy::module_inception)]
mod dialer;
mod event;
mod mock_device;
mod status;

pub use {
    backend_client::BackendClient,
    device::{CallHandle, CallParams, DeviceConnector, DialerBackend, VoiceDevice},
    dialer::{Dialer, SessionState, device_error},
    event::{CallEvent, DeviceEvent, DialerCommand, DialerEvent},
    mock_device::{MOCK_ANSWER_DELAY, MOCK_HANGUP_DELAY, MockDeviceConnector, MockVoiceDevice},
    status::ConnectionStatus,
};
