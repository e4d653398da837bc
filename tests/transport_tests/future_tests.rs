//! ResultFuture Tests
//!
//! Tests verify:
//! - Fulfilled futures deliver their message
//! - Timeouts fire after the configured duration, not before
//! - A dropped producer surfaces as Disconnected
//! - Fulfilling after the consumer gave up is harmless

use std::thread;
use std::time::{Duration, Instant};

use grouplink::network::ResultFuture;
use grouplink::LinkError;

#[test]
fn test_ready_future_resolves() {
    let future = ResultFuture::ready("t1", r#"{"status":200}"#);
    assert_eq!(future.tag(), "t1");
    assert_eq!(future.wait(Duration::from_secs(1)).unwrap(), r#"{"status":200}"#);
}

#[test]
fn test_fulfilled_from_another_thread() {
    let (fulfiller, future) = ResultFuture::pending("t2");

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        fulfiller.fulfill("late but in time")
    });

    let msg = future.wait(Duration::from_secs(2)).unwrap();
    assert_eq!(msg, "late but in time");
    assert!(handle.join().unwrap());
}

#[test]
fn test_timeout_is_not_early() {
    let (_fulfiller, future) = ResultFuture::pending("t3");
    let timeout = Duration::from_millis(150);

    let start = Instant::now();
    let err = future.wait(timeout).unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, LinkError::Timeout(d) if d == timeout));
    assert!(elapsed >= timeout, "returned after {:?}", elapsed);
    assert!(elapsed < timeout + Duration::from_secs(1), "returned after {:?}", elapsed);
}

#[test]
fn test_dropped_fulfiller_is_disconnected() {
    let (fulfiller, future) = ResultFuture::pending("t4");
    drop(fulfiller);

    let start = Instant::now();
    let err = future.wait(Duration::from_secs(5)).unwrap_err();

    assert!(matches!(err, LinkError::Disconnected));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_fulfill_after_consumer_gone() {
    let (fulfiller, future) = ResultFuture::pending("t5");
    drop(future);
    assert!(!fulfiller.fulfill("nobody is listening"));
}

#[test]
fn test_timed_out_future_ignores_late_reply() {
    let (fulfiller, future) = ResultFuture::pending("t6");
    assert!(future.wait(Duration::from_millis(10)).is_err());
    assert!(!fulfiller.fulfill("too late"));
}
