mod calls;
mod recording_status;
mod recordings;
mod token;
mod voice;

pub(crate) use {
    calls::list_calls,
    recording_status::recording_status,
    recordings::{RecordingsParams, list_recordings},
    token::{TokenParams, issue_token},
    voice::{VoiceForm, route_call},
};
