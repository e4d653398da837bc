//! Response Resolver
//!
//! Turns one outstanding `ResultFuture` into a typed value or a typed error.
//!
//! ## Resolution Steps
//! 1. Race the future against the timeout
//! 2. Decode the body into a `ResponseEnvelope`
//! 3. Require `status == 200`
//! 4. Run the caller's extraction on the envelope

use std::time::Duration;

use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::network::ResultFuture;
use crate::protocol::{decode_envelope, ResponseEnvelope};

/// Waits on futures with a bounded timeout and validates their replies
#[derive(Debug, Clone, Copy)]
pub struct ResponseResolver {
    timeout: Duration,
}

impl ResponseResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolver using the configured message timeout
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.msg_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same resolver with a different timeout (per-call override)
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolve a future, extracting the payload with `extract`
    ///
    /// `extract` is only called for status 200 and should fail with
    /// `MalformedResponse` when the documented fields are missing.
    pub fn resolve<T, F>(&self, future: ResultFuture, extract: F) -> Result<T>
    where
        F: FnOnce(ResponseEnvelope) -> Result<T>,
    {
        let tag = future.tag().to_string();

        let raw = future.wait(self.timeout).map_err(|e| {
            tracing::debug!("Request {} did not resolve: {}", tag, e);
            e
        })?;

        let envelope = decode_envelope(&raw).map_err(|e| {
            tracing::warn!("Request {} returned an undecodable body: {}", tag, e);
            e
        })?;

        if !envelope.is_success() {
            tracing::debug!("Request {} rejected with status {}", tag, envelope.status());
            return Err(LinkError::RequestRejected {
                status: envelope.status(),
            });
        }

        extract(envelope)
    }

    /// Resolve a future whose payload is a single string field
    pub fn resolve_string_field(&self, future: ResultFuture, field: &str) -> Result<String> {
        self.resolve(future, |envelope| envelope.string_field(field))
    }

    /// Resolve a future where only the status matters
    pub fn resolve_ack(&self, future: ResultFuture) -> Result<()> {
        self.resolve(future, |_| Ok(()))
    }
}

/// Lifecycle of a one-shot exchange
///
/// Starts `Pending` and moves to exactly one terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeState<T> {
    Pending,
    Resolved(T),
    Rejected(i64),
    TimedOut,
    Malformed(String),
    /// Submission, decode or transport failure
    Failed(String),
}

impl<T> ExchangeState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExchangeState::Pending)
    }

    /// Record the outcome of a resolution.
    ///
    /// Returns false and leaves the state alone if it is already terminal.
    pub fn complete(&mut self, outcome: Result<T>) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self = ExchangeState::from(outcome);
        true
    }
}

impl<T> Default for ExchangeState<T> {
    fn default() -> Self {
        ExchangeState::Pending
    }
}

impl<T> From<Result<T>> for ExchangeState<T> {
    fn from(outcome: Result<T>) -> Self {
        match outcome {
            Ok(value) => ExchangeState::Resolved(value),
            Err(LinkError::RequestRejected { status }) => ExchangeState::Rejected(status),
            Err(LinkError::Timeout(_)) => ExchangeState::TimedOut,
            Err(LinkError::MalformedResponse(msg)) => ExchangeState::Malformed(msg),
            Err(e) => ExchangeState::Failed(e.to_string()),
        }
    }
}
