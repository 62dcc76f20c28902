//! Asynchronous dispatch: fire-and-forget fan-out with failure isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use domainbus::{
    AsyncHandler, DomainBus, HandlerError, ImmediateExecutor, Message, MessageId,
    TaskExecutor, ThreadPoolExecutor, UserData,
};

use crate::support::{
    capture_logs, standard_keys, wait_until, AlwaysFailingHandler, CountingHandler,
    JournalingHandler, ScanAccessHandler,
};

// ============================================================================
// Test 1: every subscribed handler sees the message exactly once
// ============================================================================

#[test]
fn fan_out_reaches_every_subscriber_exactly_once() {
    let keys = standard_keys();
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    let pool = Arc::new(ThreadPoolExecutor::new(4));
    let bus = DomainBus::builder()
        .async_handler(ScanAccessHandler {
            keys: standard_keys(),
            granted: Arc::clone(&first),
        })
        .async_handler(ScanAccessHandler {
            keys: standard_keys(),
            granted: Arc::clone(&second),
        })
        .build(Arc::clone(&pool) as Arc<dyn TaskExecutor>)
        .unwrap();

    let mut message = Message::new(MessageId::UserAddedToProject);
    message
        .set(
            &keys.project_to_user_data,
            &UserData {
                user_id: "alice".into(),
                project_id: Some("gamechanger".into()),
                ..UserData::default()
            },
        )
        .unwrap();
    bus.send_async(message);

    // Drain the pool: afterwards every submitted invocation has finished.
    drop(bus);
    let stats = pool.shutdown();

    assert_eq!(stats.tasks_run, 2);
    assert_eq!(*first.lock().unwrap(), vec!["alice".to_string()]);
    assert_eq!(*second.lock().unwrap(), vec!["alice".to_string()]);
}

// ============================================================================
// Test 2: send_async does not block on handler execution
// ============================================================================

struct SlowHandler {
    started: Arc<AtomicUsize>,
}

impl AsyncHandler for SlowHandler {
    fn supported(&self) -> Vec<MessageId> {
        vec![MessageId::JobDone]
    }

    fn receive_async(&self, _message: &Message) -> Result<(), HandlerError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
    }
}

#[test]
fn send_async_returns_before_handlers_finish() {
    let started = Arc::new(AtomicUsize::new(0));
    let pool = Arc::new(ThreadPoolExecutor::new(2));
    let bus = DomainBus::builder()
        .async_handler(SlowHandler {
            started: Arc::clone(&started),
        })
        .build(Arc::clone(&pool) as Arc<dyn TaskExecutor>)
        .unwrap();

    let before = Instant::now();
    bus.send_async(Message::new(MessageId::JobDone));
    let elapsed = before.elapsed();

    // The handler sleeps 300ms; submission must return well before that.
    assert!(
        elapsed < Duration::from_millis(150),
        "send_async blocked for {:?}",
        elapsed
    );

    assert!(wait_until(Duration::from_secs(2), || {
        started.load(Ordering::SeqCst) == 1
    }));
    drop(bus);
    pool.shutdown();
}

// ============================================================================
// Test 3: one failing handler never stops its siblings
// ============================================================================

#[test]
fn failing_handler_is_isolated_from_siblings() {
    let failing = Arc::new(AtomicUsize::new(0));
    let surviving = Arc::new(AtomicUsize::new(0));

    let pool = Arc::new(ThreadPoolExecutor::new(4));
    let bus = DomainBus::builder()
        .async_handler(AlwaysFailingHandler {
            ids: vec![MessageId::UserCreated],
            invocations: Arc::clone(&failing),
        })
        .async_handler(CountingHandler {
            ids: vec![MessageId::UserCreated],
            invocations: Arc::clone(&surviving),
        })
        .build(Arc::clone(&pool) as Arc<dyn TaskExecutor>)
        .unwrap();

    // The producer observes no error from the failing handler.
    bus.send_async(Message::new(MessageId::UserCreated));

    drop(bus);
    let stats = pool.shutdown();

    assert_eq!(failing.load(Ordering::SeqCst), 1);
    assert_eq!(surviving.load(Ordering::SeqCst), 1);
    assert_eq!(stats.tasks_run, 2);
    assert_eq!(stats.tasks_panicked, 0);
}

// ============================================================================
// Test 4: the failure is logged with message context
// ============================================================================

#[test]
fn handler_failure_is_logged_with_context() {
    let failing = Arc::new(AtomicUsize::new(0));

    // Inline executor so the failure log lands on this thread.
    let bus = DomainBus::builder()
        .async_handler(AlwaysFailingHandler {
            ids: vec![MessageId::UserCreated],
            invocations: Arc::clone(&failing),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    let logs = capture_logs(|| {
        bus.send_async(Message::new(MessageId::UserCreated));
    });

    assert_eq!(failing.load(Ordering::SeqCst), 1);
    assert!(logs.contains("asynchronous handler failed"), "logs: {}", logs);
    assert!(logs.contains("UserCreated"), "logs: {}", logs);
    assert!(logs.contains("always fails"), "logs: {}", logs);
}

// ============================================================================
// Test 5: zero subscribers is a warning, not an error
// ============================================================================

#[test]
fn no_subscriber_is_a_logged_warning() {
    let bus = DomainBus::builder()
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    let logs = capture_logs(|| {
        // Returns immediately; nothing to panic, nothing to raise.
        bus.send_async(Message::new(MessageId::JobStarted));
    });

    assert!(logs.contains("WARN"), "logs: {}", logs);
    assert!(
        logs.contains("no asynchronous handler registered"),
        "logs: {}",
        logs
    );
    assert!(logs.contains("JobStarted"), "logs: {}", logs);
}

// ============================================================================
// Test 6: submission order follows registration order
// ============================================================================

#[test]
fn submission_order_follows_registration_order() {
    let journal = Arc::new(Mutex::new(Vec::new()));

    // Inline executor makes submission order directly observable.
    let bus = DomainBus::builder()
        .async_handler(JournalingHandler {
            ids: vec![MessageId::ProjectCreated],
            tag: "first",
            journal: Arc::clone(&journal),
        })
        .async_handler(JournalingHandler {
            ids: vec![MessageId::ProjectCreated],
            tag: "second",
            journal: Arc::clone(&journal),
        })
        .async_handler(JournalingHandler {
            ids: vec![MessageId::ProjectCreated],
            tag: "third",
            journal: Arc::clone(&journal),
        })
        .build(Arc::new(ImmediateExecutor))
        .unwrap();

    bus.send_async(Message::new(MessageId::ProjectCreated));

    assert_eq!(*journal.lock().unwrap(), vec!["first", "second", "third"]);
}

// ============================================================================
// Test 7: many sends across kinds all arrive
// ============================================================================

#[test]
fn burst_of_sends_is_fully_delivered() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let pool = Arc::new(ThreadPoolExecutor::new(4));
    let bus = DomainBus::builder()
        .async_handler(CountingHandler {
            ids: vec![MessageId::JobStarted, MessageId::JobDone, MessageId::JobFailed],
            invocations: Arc::clone(&invocations),
        })
        .build(Arc::clone(&pool) as Arc<dyn TaskExecutor>)
        .unwrap();

    for _ in 0..50 {
        bus.send_async(Message::new(MessageId::JobStarted));
        bus.send_async(Message::new(MessageId::JobDone));
        bus.send_async(Message::new(MessageId::JobFailed));
    }

    drop(bus);
    let stats = pool.shutdown();

    assert_eq!(invocations.load(Ordering::SeqCst), 150);
    assert_eq!(stats.tasks_run, 150);
}
