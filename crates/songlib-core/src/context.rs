//! Cancellation and deadline context threaded through blocking database work
//!
//! The migration runner calls [`RunContext::check`] before every database call,
//! so a cancelled token or an expired deadline stops a run at the next
//! statement boundary. A statement that is already executing is never
//! interrupted.

use std::time::{Duration, Instant};

pub use tokio_util::sync::CancellationToken;

use crate::errors::{ExError, ExErrorKind, Result};

/// Cancellation token plus an optional deadline
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RunContext {
    /// A context that never cancels and never times out
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context observing an existing token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The token this context observes
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the context was cancelled or its deadline has passed
    ///
    /// `op` names the call about to be made and is recorded on the error.
    pub fn check(&self, op: &str) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(ExError::new(ExErrorKind::Cancelled)
                .with_op(op)
                .with_message("run cancelled"));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ExError::new(ExErrorKind::Timeout)
                    .with_op(op)
                    .with_message("deadline exceeded"));
            }
        }
        Ok(())
    }
}
