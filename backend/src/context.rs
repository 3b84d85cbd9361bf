//! Per-request cancellation and deadline.
//!
//! Every pipeline stage receives a [`RequestContext`] and calls
//! [`RequestContext::check`] before doing any work.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{MatrixError, MatrixResult};

/// Cancellation token plus an optional deadline for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Use an existing token, e.g. a child of a server-wide token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail with [`MatrixError::Cancelled`] or [`MatrixError::DeadlineExceeded`]
    /// if the request should stop.
    ///
    /// Cancellation wins when both conditions hold.
    pub fn check(&self) -> MatrixResult<()> {
        if self.token.is_cancelled() {
            return Err(MatrixError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(MatrixError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
