//! Shared test helpers
//!
//! A scripted in-process connection that records what it was sent.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use grouplink::network::{Connection, Fulfiller, ResultFuture};
use grouplink::protocol::Request;
use grouplink::{LinkError, Result};
use parking_lot::Mutex;

/// How the mock answers one request
#[derive(Debug, Clone)]
pub enum Reply {
    /// Fulfill immediately with this body
    Body(String),

    /// Fulfill from another thread after a delay
    Delayed(Duration, String),

    /// Never answer (the fulfiller is kept alive)
    Silent,

    /// Fail at submission time
    Refuse,
}

/// Scripted connection
///
/// Replies are consumed in order; once the script runs out the fallback
/// reply (if any) is used for every further request.
pub struct MockConnection {
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<Reply>>,
    sent: Mutex<Vec<Request>>,
    held: Mutex<Vec<Fulfiller>>,
    sends: AtomicUsize,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            sends: AtomicUsize::new(0),
        }
    }

    /// Queue one reply
    pub fn reply(self, reply: Reply) -> Self {
        self.script.lock().push_back(reply);
        self
    }

    /// Queue one immediate body
    pub fn respond(self, body: &str) -> Self {
        self.reply(Reply::Body(body.to_string()))
    }

    /// Reply used when the script is empty
    pub fn always(self, reply: Reply) -> Self {
        *self.fallback.lock() = Some(reply);
        self
    }

    /// Number of requests that reached `send`
    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    /// Wire form of every request sent so far
    pub fn sent_values(&self) -> Vec<serde_json::Value> {
        self.sent.lock().iter().map(|r| r.to_value()).collect()
    }
}

impl Connection for MockConnection {
    fn send(&self, request: &Request) -> Result<ResultFuture> {
        let n = self.sends.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().push(request.clone());

        let reply = self
            .script
            .lock()
            .pop_front()
            .or_else(|| self.fallback.lock().clone())
            .unwrap_or(Reply::Silent);

        let (fulfiller, future) = ResultFuture::pending(format!("mock.{}", n));
        match reply {
            Reply::Body(body) => {
                fulfiller.fulfill(body);
            }
            Reply::Delayed(delay, body) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    fulfiller.fulfill(body);
                });
            }
            Reply::Silent => self.held.lock().push(fulfiller),
            Reply::Refuse => {
                return Err(LinkError::Submission("connection closed".to_string()));
            }
        }
        Ok(future)
    }
}

/// Metadata body the mock service sends for `group123@g.us`
pub fn metadata_body() -> String {
    serde_json::json!({
        "status": 200,
        "id": "group123@g.us",
        "owner": "owner@c.us",
        "subject": "Weekend plans",
        "creation": 1_600_000_000u64,
        "participants": [
            { "id": "owner@c.us", "isAdmin": true, "isSuperAdmin": true },
            { "id": "member@c.us", "isAdmin": false, "isSuperAdmin": false }
        ],
        "subjectTime": 1_600_000_100i64,
        "subjectOwner": "owner@c.us"
    })
    .to_string()
}
