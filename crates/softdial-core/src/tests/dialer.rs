use crate::{
    CallEvent, CallLogs, CallParams, Company, ConnectionStatus, DeviceConnector, DeviceEvent,
    Dialer, DialerCommand, DialerError, DialerEvent, MOCK_ANSWER_DELAY, MOCK_HANGUP_DELAY,
    MockDeviceConnector,
    tests::support::{FakeBackend, RecordingConnector},
};

use std::sync::Arc;

use tokio::{sync::mpsc, time::Instant};
use uuid::Uuid;

async fn ready_dialer() -> (Dialer, RecordingConnector) {
    let connector = RecordingConnector::default();
    let mut dialer = Dialer::new(
        Arc::new(FakeBackend::with_token("tok-1")),
        Arc::new(connector.clone()),
    );
    let _ = dialer.initialize("agent-1").await;
    (dialer, connector)
}

/// WHAT: Successful token request leads to Ready
/// WHY: The Call button is enabled only once a device exists
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_token_available_when_initializing_then_ready() {
    // Given: A backend that issues tokens
    let connector = RecordingConnector::default();
    let mut dialer = Dialer::new(
        Arc::new(FakeBackend::with_token("tok-1")),
        Arc::new(connector.clone()),
    );
    let mut status_rx = dialer.subscribe();

    // When: Initializing
    dialer.initialize("agent-1").await.unwrap();

    // Then: Ready, device created with the issued token
    assert_eq!(dialer.status(), ConnectionStatus::Ready { registered: false });
    assert!(status_rx.has_changed().unwrap());
    assert_eq!(*status_rx.borrow_and_update(), ConnectionStatus::Ready { registered: false });
    assert_eq!(connector.log().tokens, vec!["tok-1".to_string()]);
    assert_eq!(dialer.session().identity, "agent-1");
}

/// WHAT: Token failure leads to Error, never Ready
/// WHY: Failures surface in the status banner and are not retried
#[tokio::test]
async fn given_token_failure_when_initializing_then_error_state() {
    // Given: A backend whose token endpoint fails
    let connector = RecordingConnector::default();
    let mut dialer = Dialer::new(Arc::new(FakeBackend::failing()), Arc::new(connector.clone()));

    // When: Initializing
    let result = dialer.initialize("agent-1").await;

    // Then: Error carrying the message, no device
    assert!(matches!(
        result,
        Err(DialerError::TokenIssuanceFailure { .. })
    ));
    assert_eq!(
        dialer.status(),
        ConnectionStatus::Error {
            message: "token endpoint unreachable".to_string()
        }
    );
    assert_eq!(dialer.status_label(), "Error: token endpoint unreachable");
    assert!(connector.log().tokens.is_empty());
    assert!(!dialer.can_place_call());
}

/// WHAT: Acknowledging an error returns to Idle
/// WHY: Users recover by dismissing and retrying
#[tokio::test]
async fn given_error_state_when_acknowledged_then_idle() {
    let mut dialer = Dialer::new(
        Arc::new(FakeBackend::failing()),
        Arc::new(RecordingConnector::default()),
    );
    let _ = dialer.initialize("agent-1").await;

    dialer.acknowledge_error();

    assert_eq!(dialer.status(), ConnectionStatus::Idle);
}

/// WHAT: Registration event marks the ready device as registered
/// WHY: The banner distinguishes Ready from Registered
#[tokio::test]
async fn given_ready_when_registered_event_then_label_registered() {
    let (mut dialer, _) = ready_dialer().await;

    dialer.handle_event(DialerEvent::Device(DeviceEvent::Registered));

    assert_eq!(dialer.status_label(), "Registered");
}

/// WHAT: Empty target is a no-op
/// WHY: Call placement silently declines invalid input
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_empty_target_when_placing_call_then_nothing_happens() {
    // Given: A ready dialer
    let (mut dialer, connector) = ready_dialer().await;
    let before = dialer.status();

    // When: Placing a call with empty and blank targets
    let empty = dialer.place_call("", Company::A).await.unwrap();
    let blank = dialer.place_call("   ", Company::B).await.unwrap();

    // Then: No attempt, no adapter call, same status
    assert_eq!(empty, None);
    assert_eq!(blank, None);
    assert!(connector.log().connects.is_empty());
    assert_eq!(dialer.status(), before);
}

/// WHAT: Placing a call tags destination and company and moves to Dialing
/// WHY: The voice webhook reads To and Company from the call parameters
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_ready_when_placing_call_then_dialing_with_params() {
    // Given: A ready dialer
    let (mut dialer, connector) = ready_dialer().await;

    // When: Placing a call for company B
    let attempt = dialer.place_call("+15551234567", Company::B).await.unwrap();

    // Then: Dialing, one connect with tagged params
    assert!(attempt.is_some());
    assert_eq!(
        dialer.status(),
        ConnectionStatus::Dialing {
            target: "+15551234567".to_string()
        }
    );
    assert_eq!(dialer.status_label(), "Calling...");
    let log = connector.log();
    assert_eq!(log.connects.len(), 1);
    assert_eq!(log.connects[0].1.to, "+15551234567");
    assert_eq!(log.connects[0].1.company, Company::B);
}

/// WHAT: A second call while dialing is ignored
/// WHY: At most one active call exists at a time
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_dialing_when_placing_second_call_then_ignored() {
    let (mut dialer, connector) = ready_dialer().await;
    dialer.place_call("+15551234567", Company::A).await.unwrap();

    let second = dialer.place_call("+15559999999", Company::A).await.unwrap();

    assert_eq!(second, None);
    assert_eq!(connector.log().connects.len(), 1);
}

/// WHAT: Accept then disconnect walks Dialing -> InCall -> Idle
/// WHY: Status mirrors the adapter's call lifecycle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_placed_call_when_accepted_and_disconnected_then_back_to_idle() {
    // Given: A placed call
    let (mut dialer, _) = ready_dialer().await;
    let attempt = dialer.place_call("+15551234567", Company::A).await.unwrap().unwrap();

    // When: The adapter reports accept
    dialer.handle_event(DialerEvent::Call {
        attempt_id: attempt,
        event: CallEvent::Accept,
    });

    // Then: In call
    assert_eq!(dialer.status(), ConnectionStatus::InCall);
    assert!(dialer.session().has_active_call);

    // When: The adapter reports disconnect
    dialer.handle_event(DialerEvent::Call {
        attempt_id: attempt,
        event: CallEvent::Disconnect,
    });

    // Then: Idle, handle released, new calls allowed
    assert_eq!(dialer.status(), ConnectionStatus::Idle);
    assert!(!dialer.session().has_active_call);
    assert!(dialer.can_place_call());
}

/// WHAT: Cancel and call errors release the handle
/// WHY: A failed call must not block the next one
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_placed_call_when_canceled_or_failed_then_handle_cleared() {
    let (mut dialer, _) = ready_dialer().await;

    let first = dialer.place_call("+1555", Company::A).await.unwrap().unwrap();
    dialer.handle_event(DialerEvent::Call {
        attempt_id: first,
        event: CallEvent::Cancel,
    });
    assert_eq!(dialer.status_label(), "Canceled");
    assert!(dialer.can_place_call());

    let second = dialer.place_call("+1555", Company::A).await.unwrap().unwrap();
    dialer.handle_event(DialerEvent::Call {
        attempt_id: second,
        event: CallEvent::Error {
            message: "busy signal".to_string(),
        },
    });
    assert_eq!(dialer.status_label(), "Error: busy signal");
    assert!(!dialer.session().has_active_call);
}

/// WHAT: Events of an earlier attempt are ignored
/// WHY: A late disconnect must not end the current call
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stale_attempt_event_when_handled_then_ignored() {
    let (mut dialer, _) = ready_dialer().await;
    let attempt = dialer.place_call("+1555", Company::A).await.unwrap().unwrap();
    dialer.handle_event(DialerEvent::Call {
        attempt_id: attempt,
        event: CallEvent::Accept,
    });

    dialer.handle_event(DialerEvent::Call {
        attempt_id: Uuid::new_v4(),
        event: CallEvent::Disconnect,
    });

    assert_eq!(dialer.status(), ConnectionStatus::InCall);
}

/// WHAT: Hang up instructs the adapter only when a call is active
/// WHY: Hang up is idempotent
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_active_or_no_call_when_hanging_up_then_disconnect_only_if_active() {
    let (mut dialer, connector) = ready_dialer().await;

    dialer.hang_up();
    assert_eq!(connector.log().disconnects, 0);

    dialer.place_call("+1555", Company::A).await.unwrap();
    dialer.hang_up();
    assert_eq!(connector.log().disconnects, 1);
}

/// WHAT: Incoming calls are rejected
/// WHY: Tokens grant outbound calling only
#[tokio::test]
async fn given_incoming_call_when_handled_then_rejected() {
    let (mut dialer, connector) = ready_dialer().await;

    dialer.handle_event(DialerEvent::Device(DeviceEvent::Incoming {
        call_sid: "CAin".to_string(),
        from: "+1888".to_string(),
    }));

    assert_eq!(connector.log().rejected, vec!["CAin".to_string()]);
    assert_eq!(dialer.status(), ConnectionStatus::Ready { registered: false });
}

/// WHAT: Device errors move to Error from any state
/// WHY: The adapter's failures are always visible
#[tokio::test]
async fn given_device_error_when_handled_then_error_state() {
    let (mut dialer, _) = ready_dialer().await;

    dialer.handle_event(DialerEvent::Device(DeviceEvent::Error {
        message: "ICE failed".to_string(),
    }));

    assert_eq!(dialer.status_label(), "Error: ICE failed");
}

/// WHAT: Teardown hangs up and releases the device
/// WHY: The device handle is owned by the session
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_active_call_when_tearing_down_then_device_released() {
    let (mut dialer, connector) = ready_dialer().await;
    dialer.place_call("+1555", Company::A).await.unwrap();

    dialer.teardown();

    let log = connector.log();
    assert_eq!(log.disconnects, 1);
    assert_eq!(log.destroyed, 1);
    drop(log);
    assert!(!dialer.can_place_call());
}

/// WHAT: Failed history load moves to Error and keeps old logs
/// WHY: Partial data is never shown
#[tokio::test]
async fn given_failing_backend_when_loading_logs_then_error_state() {
    let mut dialer = Dialer::new(
        Arc::new(FakeBackend::failing()),
        Arc::new(RecordingConnector::default()),
    );

    let result = dialer.load_logs().await;

    assert!(matches!(
        result,
        Err(DialerError::UpstreamUnavailable { .. })
    ));
    assert!(!dialer.is_loading_logs());
    assert_eq!(dialer.logs(), &CallLogs::default());
    assert!(matches!(dialer.status(), ConnectionStatus::Error { .. }));
}

/// WHAT: Mock call walks the fixed timeline
/// WHY: Offline mode must behave like a short answered call
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_mock_mode_when_placing_call_then_status_sequence_with_delays() {
    // Given: An initialized mock dialer with the registration event drained
    let mut dialer = Dialer::mock(Arc::new(FakeBackend::with_token("mock-agent")));
    dialer.initialize("agent").await.unwrap();
    assert!(dialer.process_next_event().await);
    assert_eq!(dialer.status_label(), "Mock mode: ready");
    let mut labels = vec!["Idle".to_string()];

    // When: Placing a call and letting the timeline run
    let started = Instant::now();
    dialer.place_call("+15551234567", Company::A).await.unwrap();
    labels.push(dialer.status_label());

    assert!(dialer.process_next_event().await);
    let answered_after = started.elapsed();
    labels.push(dialer.status_label());

    assert!(dialer.process_next_event().await);
    let ended_after = started.elapsed();
    labels.push(dialer.status_label());

    // Then: Expected labels at the expected times
    assert_eq!(
        labels,
        vec!["Idle", "Mock: calling +15551234567", "Mock: in call", "Idle"]
    );
    assert!(answered_after >= MOCK_ANSWER_DELAY);
    assert!(answered_after < MOCK_HANGUP_DELAY);
    assert!(ended_after >= MOCK_HANGUP_DELAY);
}

/// WHAT: Hanging up a mock call ends it immediately
/// WHY: Users can end a call before the timeline does
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_mock_call_when_hanging_up_then_idle_before_timeline() {
    let mut dialer = Dialer::mock(Arc::new(FakeBackend::with_token("mock-agent")));
    dialer.initialize("agent").await.unwrap();
    assert!(dialer.process_next_event().await);

    let started = Instant::now();
    dialer.place_call("+15551234567", Company::B).await.unwrap();
    dialer.hang_up();
    assert!(dialer.process_next_event().await);

    assert_eq!(dialer.status(), ConnectionStatus::Idle);
    assert!(started.elapsed() < MOCK_ANSWER_DELAY);
}

/// WHAT: The command loop drives the session until shutdown
/// WHY: UIs talk to a running session through commands
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_session_when_commands_sent_then_status_published() {
    // Given: A session running its own loop
    let connector = RecordingConnector::default();
    let dialer = Dialer::new(
        Arc::new(FakeBackend::with_token("tok-1")),
        Arc::new(connector.clone()),
    );
    let mut status_rx = dialer.subscribe();
    let (command_tx, command_rx) = mpsc::channel(8);
    let session = tokio::spawn(dialer.run(command_rx));

    // When: Initializing and then dialing
    command_tx
        .send(DialerCommand::Initialize {
            identity: "agent-1".to_string(),
        })
        .await
        .unwrap();
    status_rx
        .wait_for(|s| matches!(s, ConnectionStatus::Ready { .. }))
        .await
        .unwrap();

    command_tx
        .send(DialerCommand::PlaceCall {
            target: "+1555".to_string(),
            company: Company::A,
        })
        .await
        .unwrap();
    status_rx
        .wait_for(|s| matches!(s, ConnectionStatus::Dialing { .. }))
        .await
        .unwrap();

    let attempt = connector.log().connects[0].0;
    connector.emit_call(attempt, CallEvent::Accept).await;
    status_rx
        .wait_for(|s| *s == ConnectionStatus::InCall)
        .await
        .unwrap();

    // Then: Shutdown tears the session down
    command_tx.send(DialerCommand::Shutdown).await.unwrap();
    session.await.unwrap();
    assert_eq!(connector.log().disconnects, 1);
    assert_eq!(connector.log().destroyed, 1);
}

async fn answered_call_with_failing_history() -> (Dialer, RecordingConnector, Uuid) {
    let connector = RecordingConnector::default();
    let backend = FakeBackend {
        token: Some("tok-1".to_string()),
        logs: None,
        recordings: Vec::new(),
    };
    let mut dialer = Dialer::new(Arc::new(backend), Arc::new(connector.clone()));
    let _ = dialer.initialize("agent-1").await;
    let attempt_id = dialer
        .place_call("+15551234567", Company::A)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    dialer.handle_event(DialerEvent::Call {
        attempt_id,
        event: CallEvent::Accept,
    });
    (dialer, connector, attempt_id)
}

/// WHAT: A failed history refresh during a call keeps the call status
/// WHY: Idle or Ready must never be shown while a call handle is held
#[tokio::test]
async fn given_call_in_progress_when_history_refresh_fails_then_call_status_kept() {
    // Given: An answered call and a backend whose history endpoint fails
    let (mut dialer, _, _) = answered_call_with_failing_history().await;
    assert_eq!(dialer.status(), ConnectionStatus::InCall);

    // When: Refreshing history
    let result = dialer.load_logs().await;

    // Then: The error is returned but the call is still shown as up
    assert!(matches!(
        result,
        Err(DialerError::UpstreamUnavailable { .. })
    ));
    assert_eq!(dialer.status(), ConnectionStatus::InCall);
    assert_eq!(dialer.status_label(), "In call");
    assert!(dialer.session().has_active_call);
}

/// WHAT: Acknowledging a device error mid-call returns to the call status
/// WHY: The live call still owns the device, so re-initializing must not destroy it
#[tokio::test]
async fn given_device_error_during_call_when_acknowledged_then_in_call_and_reinit_refused() {
    // Given: An answered call hit by a device error
    let (mut dialer, connector, _) = answered_call_with_failing_history().await;
    dialer.handle_event(DialerEvent::Device(DeviceEvent::Error {
        message: "media degraded".to_string(),
    }));
    assert_eq!(dialer.status_label(), "Error: media degraded");

    // When: Acknowledging the error and trying to initialize again
    dialer.acknowledge_error();
    let reinit = dialer.initialize("agent-1").await;

    // Then: Still in the call, same device, nothing destroyed
    assert!(reinit.is_ok());
    assert_eq!(dialer.status(), ConnectionStatus::InCall);
    assert!(dialer.session().has_active_call);
    let log = connector.log();
    assert_eq!(log.destroyed, 0);
    assert_eq!(log.tokens.len(), 1);
}

/// WHAT: Acknowledging an error before answer returns to Dialing
/// WHY: The status must match the unanswered call still held
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_device_error_while_dialing_when_acknowledged_then_dialing_again() {
    // Given: A placed, unanswered call hit by a device error
    let (mut dialer, _) = ready_dialer().await;
    dialer.place_call("+15551234567", Company::B).await.unwrap();
    dialer.handle_event(DialerEvent::Device(DeviceEvent::Error {
        message: "signaling lost".to_string(),
    }));

    // When: Acknowledging
    dialer.acknowledge_error();

    // Then: Back to Dialing with the same target
    assert_eq!(
        dialer.status(),
        ConnectionStatus::Dialing {
            target: "+15551234567".to_string()
        }
    );
    assert_eq!(dialer.status_label(), "Calling...");
    assert!(dialer.session().has_active_call);
}

/// WHAT: Mock hang up is delivered even when the event channel is full
/// WHY: A dropped disconnect would leave the call active forever
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_full_event_channel_when_hanging_up_mock_call_then_disconnect_still_delivered() {
    // Given: A one-slot channel already holding the registration event
    let (events_tx, mut events_rx) = mpsc::channel(1);
    let device = MockDeviceConnector
        .create_device("mock-agent", events_tx)
        .await
        .unwrap();
    let attempt_id = Uuid::new_v4();
    let handle = device
        .connect(
            attempt_id,
            CallParams {
                to: "+15551234567".to_string(),
                company: Company::A,
            },
        )
        .await
        .unwrap();

    // When: Hanging up before anything is drained
    handle.disconnect();

    // Then: Registration, then the disconnect, and no answer from the aborted timeline
    assert!(matches!(
        events_rx.recv().await,
        Some(DialerEvent::Device(DeviceEvent::Registered))
    ));
    assert!(matches!(
        events_rx.recv().await,
        Some(DialerEvent::Call { attempt_id: id, event: CallEvent::Disconnect }) if id == attempt_id
    ));
    tokio::time::sleep(MOCK_HANGUP_DELAY * 2).await;
    assert!(events_rx.try_recv().is_err());
}
