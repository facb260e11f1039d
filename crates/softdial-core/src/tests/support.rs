use crate::{
    CallEvent, CallHandle, CallLogs, CallParams, CallQuery, CoreResult, DeviceConnector,
    DialerBackend, DialerError, DialerEvent, RecordingQuery, RecordingRecord, TelephonyApi,
    UpstreamCall, UpstreamRecording, VoiceDevice,
    model::{CallDirection, CallStatus},
};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use uuid::Uuid;

#[track_caller]
pub(crate) fn upstream_error() -> DialerError {
    DialerError::UpstreamUnavailable {
        reason: "platform unreachable".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

pub(crate) fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn call(sid: &str, from: &str, to: &str, start: Option<DateTime<Utc>>) -> UpstreamCall {
    UpstreamCall {
        sid: sid.to_string(),
        to: Some(to.to_string()),
        to_formatted: None,
        from: Some(from.to_string()),
        start_time: start,
        date_created: start,
        duration: Some("30".to_string()),
        status: CallStatus::Completed,
        direction: CallDirection::OutboundApi,
    }
}

pub(crate) fn recording(sid: &str, call_sid: &str) -> UpstreamRecording {
    UpstreamRecording {
        sid: sid.to_string(),
        call_sid: Some(call_sid.to_string()),
        duration: Some("12".to_string()),
        date_created: Some(at(0)),
    }
}

/// In-memory platform that records every query it receives.
pub(crate) struct FakeTelephony {
    pub(crate) calls: Vec<UpstreamCall>,
    pub(crate) recordings: Vec<UpstreamRecording>,
    pub(crate) fail: bool,
    pub(crate) call_queries: Mutex<Vec<CallQuery>>,
    pub(crate) recording_queries: Mutex<Vec<RecordingQuery>>,
}

impl FakeTelephony {
    pub(crate) fn new(calls: Vec<UpstreamCall>, recordings: Vec<UpstreamRecording>) -> Self {
        Self {
            calls,
            recordings,
            fail: false,
            call_queries: Mutex::new(Vec::new()),
            recording_queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        let mut fake = Self::new(Vec::new(), Vec::new());
        fake.fail = true;
        fake
    }
}

#[async_trait]
impl TelephonyApi for FakeTelephony {
    fn account_sid(&self) -> &str {
        "ACtest"
    }

    async fn list_calls(&self, query: CallQuery) -> CoreResult<Vec<UpstreamCall>> {
        if let Ok(mut queries) = self.call_queries.lock() {
            queries.push(query.clone());
        }
        if self.fail {
            return Err(upstream_error());
        }
        Ok(self
            .calls
            .iter()
            .filter(|c| query.from.as_deref().is_none_or(|f| c.from.as_deref() == Some(f)))
            .filter(|c| query.to.as_deref().is_none_or(|t| c.to.as_deref() == Some(t)))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn list_recordings(&self, query: RecordingQuery) -> CoreResult<Vec<UpstreamRecording>> {
        if let Ok(mut queries) = self.recording_queries.lock() {
            queries.push(query.clone());
        }
        if self.fail {
            return Err(upstream_error());
        }
        // Ignores the call filter on purpose, like a platform returning extras.
        Ok(self.recordings.iter().take(query.limit).cloned().collect())
    }
}

/// Backend answering from canned values.
pub(crate) struct FakeBackend {
    pub(crate) token: Option<String>,
    pub(crate) logs: Option<CallLogs>,
    pub(crate) recordings: Vec<RecordingRecord>,
}

impl FakeBackend {
    pub(crate) fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            logs: Some(CallLogs::default()),
            recordings: Vec::new(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            token: None,
            logs: None,
            recordings: Vec::new(),
        }
    }
}

#[async_trait]
impl DialerBackend for FakeBackend {
    async fn fetch_token(&self, _identity: &str) -> CoreResult<String> {
        self.token.clone().ok_or_else(|| DialerError::TokenIssuanceFailure {
            reason: "token endpoint unreachable".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn fetch_call_logs(&self) -> CoreResult<CallLogs> {
        self.logs.clone().ok_or_else(upstream_error)
    }

    async fn fetch_recordings(&self, _call_id: Option<&str>) -> CoreResult<Vec<RecordingRecord>> {
        Ok(self.recordings.clone())
    }
}

/// What the fake device was asked to do.
#[derive(Debug, Default)]
pub(crate) struct DeviceLog {
    pub(crate) tokens: Vec<String>,
    pub(crate) connects: Vec<(Uuid, CallParams)>,
    pub(crate) disconnects: usize,
    pub(crate) rejected: Vec<String>,
    pub(crate) destroyed: usize,
}

/// Connector whose devices never emit events on their own.
#[derive(Clone, Default)]
pub(crate) struct RecordingConnector {
    pub(crate) log: Arc<Mutex<DeviceLog>>,
    pub(crate) events: Arc<Mutex<Option<mpsc::Sender<DialerEvent>>>>,
}

impl RecordingConnector {
    pub(crate) fn log(&self) -> std::sync::MutexGuard<'_, DeviceLog> {
        match self.log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) async fn emit(&self, event: DialerEvent) {
        let tx = self.events.lock().ok().and_then(|guard| guard.clone());
        if let Some(tx) = tx {
            let _ = tx.send(event).await;
        }
    }

    pub(crate) async fn emit_call(&self, attempt_id: Uuid, event: CallEvent) {
        self.emit(DialerEvent::Call { attempt_id, event }).await;
    }
}

#[async_trait]
impl DeviceConnector for RecordingConnector {
    async fn create_device(
        &self,
        token: &str,
        events: mpsc::Sender<DialerEvent>,
    ) -> CoreResult<Box<dyn VoiceDevice>> {
        self.log().tokens.push(token.to_string());
        if let Ok(mut slot) = self.events.lock() {
            *slot = Some(events);
        }
        Ok(Box::new(RecordingDevice {
            log: Arc::clone(&self.log),
        }))
    }
}

struct RecordingDevice {
    log: Arc<Mutex<DeviceLog>>,
}

impl RecordingDevice {
    fn with_log(&self, f: impl FnOnce(&mut DeviceLog)) {
        if let Ok(mut log) = self.log.lock() {
            f(&mut log);
        }
    }
}

#[async_trait]
impl VoiceDevice for RecordingDevice {
    async fn connect(
        &self,
        attempt_id: Uuid,
        params: CallParams,
    ) -> CoreResult<Box<dyn CallHandle>> {
        self.with_log(|log| log.connects.push((attempt_id, params)));
        Ok(Box::new(RecordingHandle {
            log: Arc::clone(&self.log),
        }))
    }

    fn reject_incoming(&self, call_sid: &str) {
        self.with_log(|log| log.rejected.push(call_sid.to_string()));
    }

    fn destroy(&mut self) {
        self.with_log(|log| log.destroyed += 1);
    }
}

struct RecordingHandle {
    log: Arc<Mutex<DeviceLog>>,
}

impl CallHandle for RecordingHandle {
    fn disconnect(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.disconnects += 1;
        }
    }
}
