//! Synchronous dispatch: blocking, single-handler, request/response.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use domainbus::{
    DomainBus, HandlerError, ImmediateExecutor, Message, MessageId, SendError,
};

use crate::support::{standard_keys, CountingHandler, TokenRequestHandler};

// ============================================================================
// Test 1: the single handler's result comes back unchanged
// ============================================================================

#[test]
fn result_of_the_single_handler_is_returned_verbatim() {
    let keys = standard_keys();
    let bus = DomainBus::builder()
        .sync_handler(TokenRequestHandler {
            keys: standard_keys(),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    let mut request = Message::new(MessageId::UserNewApiTokenRequested);
    request.set(&keys.executed_by, &"alice".to_string()).unwrap();

    let result = bus.send_sync(request).unwrap();

    assert_eq!(result.id(), MessageId::UserNewApiTokenRequested);
    assert_eq!(
        result.get(&keys.executed_by).unwrap(),
        Some("alice".to_string())
    );
}

// ============================================================================
// Test 2: no handler for the id → typed unsupported error, no side effects
// ============================================================================

#[test]
fn unsupported_message_fails_without_side_effects() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let bus = DomainBus::builder()
        .sync_handler(TokenRequestHandler {
            keys: standard_keys(),
        })
        // Async subscribers to the same id must not be touched by a
        // failed synchronous send.
        .async_handler(CountingHandler {
            ids: vec![MessageId::ProjectDeleted],
            invocations: Arc::clone(&invocations),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    let err = bus
        .send_sync(Message::new(MessageId::ProjectDeleted))
        .unwrap_err();

    match err {
        SendError::UnsupportedMessage(id) => assert_eq!(id, MessageId::ProjectDeleted),
        other => panic!("expected unsupported message error, got {}", other),
    }
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Test 3: a handler error reaches the caller unchanged
// ============================================================================

#[test]
fn handler_error_propagates_to_the_caller() {
    let bus = DomainBus::builder()
        .sync_handler(TokenRequestHandler {
            keys: standard_keys(),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    // Request without the mandatory executed_by payload.
    let err = bus
        .send_sync(Message::new(MessageId::UserNewApiTokenRequested))
        .unwrap_err();

    match err {
        SendError::Handler(HandlerError::Rejected(reason)) => {
            assert_eq!(reason, "missing executed_by");
        }
        other => panic!("expected handler rejection, got {}", other),
    }
}

// ============================================================================
// Test 4: unsupported vs handler failure are distinguishable
// ============================================================================

#[test]
fn callers_can_distinguish_the_two_failure_kinds() {
    let bus = DomainBus::builder()
        .sync_handler(TokenRequestHandler {
            keys: standard_keys(),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    let unsupported = bus
        .send_sync(Message::new(MessageId::JobStarted))
        .unwrap_err();
    let failed = bus
        .send_sync(Message::new(MessageId::UserNewApiTokenRequested))
        .unwrap_err();

    assert!(matches!(unsupported, SendError::UnsupportedMessage(_)));
    assert!(matches!(failed, SendError::Handler(_)));
}
