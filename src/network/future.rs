//! Result futures
//!
//! One-shot handles for "the eventual response to one outstanding request".

use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{LinkError, Result};

/// Producer half: held by the transport until the response arrives
#[derive(Debug)]
pub struct Fulfiller {
    tag: String,
    tx: Sender<String>,
}

impl Fulfiller {
    /// Deliver the raw response.
    ///
    /// Consumes the fulfiller so a request can only be answered once.
    /// Returns false if the waiting side has already given up.
    pub fn fulfill(self, message: impl Into<String>) -> bool {
        self.tx.send(message.into()).is_ok()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Consumer half: the caller's view of one outstanding request
#[derive(Debug)]
pub struct ResultFuture {
    tag: String,
    rx: Receiver<String>,
}

impl ResultFuture {
    /// Create a linked fulfiller/future pair for the given message tag
    pub fn pending(tag: impl Into<String>) -> (Fulfiller, ResultFuture) {
        let tag = tag.into();
        let (tx, rx) = channel::bounded(1);
        (
            Fulfiller {
                tag: tag.clone(),
                tx,
            },
            ResultFuture { tag, rx },
        )
    }

    /// A future that is already fulfilled
    pub fn ready(tag: impl Into<String>, message: impl Into<String>) -> ResultFuture {
        let (fulfiller, future) = Self::pending(tag);
        fulfiller.fulfill(message);
        future
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Block until the response arrives or `timeout` elapses, whichever is first.
    ///
    /// On timeout the future is dropped; a late response is discarded by the
    /// transport.
    pub fn wait(self, timeout: Duration) -> Result<String> {
        let deadline = channel::after(timeout);

        crossbeam::select! {
            recv(self.rx) -> msg => msg.map_err(|_| LinkError::Disconnected),
            recv(deadline) -> _ => Err(LinkError::Timeout(timeout)),
        }
    }
}
