mod api;
mod call_record;
mod company;
mod recording_record;

pub use {
    api::{ErrorResponse, RecordingsResponse, TokenResponse},
    call_record::{CallDirection, CallLogs, CallRecord, CallStatus},
    company::{Company, CompanyNumbers},
    recording_record::RecordingRecord,
};
