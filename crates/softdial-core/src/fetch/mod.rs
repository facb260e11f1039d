mod call_logs;
mod recordings;

pub use {
    call_logs::{CALLS_PER_DIRECTION, CallLogFetcher, MAX_CALLS_PER_COMPANY, merge_call_history},
    recordings::{RECENT_RECORDINGS_LIMIT, RECORDINGS_PER_CALL_LIMIT, RecordingFetcher},
};
