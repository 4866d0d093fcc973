//! Hierarchical cancellation contexts
//!
//! A [`Context`] is canceled when its own [`CancelHandle`] fires, when any
//! ancestor is canceled, or when its deadline passes. Cancellation flows from
//! parent to child only.

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Why a context is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// When each context in a chain was explicitly canceled
#[derive(Debug, Default)]
struct CancelRecord {
    at: OnceLock<Instant>,
    parent: Option<Arc<CancelRecord>>,
}

impl CancelRecord {
    fn child(parent: &Arc<CancelRecord>) -> Arc<Self> {
        Arc::new(Self {
            at: OnceLock::new(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Earliest cancellation of this context or any ancestor
    fn earliest(&self) -> Option<Instant> {
        let mut earliest = self.at.get().copied();
        let mut next = self.parent.as_deref();
        while let Some(record) = next {
            if let Some(&at) = record.at.get() {
                earliest = Some(earliest.map_or(at, |e| e.min(at)));
            }
            next = record.parent.as_deref();
        }
        earliest
    }
}

/// Cancellation handle passed through a call graph
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
    record: Arc<CancelRecord>,
}

/// Cancels the context it was created with, and every context derived from it
#[derive(Debug)]
pub struct CancelHandle {
    token: CancellationToken,
    record: Arc<CancelRecord>,
}

impl CancelHandle {
    /// Cancel the associated context. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        self.record.at.get_or_init(Instant::now);
        self.token.cancel();
    }
}

impl Context {
    /// Root context with no deadline that is never canceled
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            record: Arc::default(),
        }
    }

    /// Derive a child context that can be canceled independently of its parent
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let token = self.token.child_token();
        let record = CancelRecord::child(&self.record);
        let ctx = Self {
            token: token.clone(),
            deadline: self.deadline,
            record: Arc::clone(&record),
        };
        (ctx, CancelHandle { token, record })
    }

    /// Derive a child context that expires at `deadline`, or earlier if the
    /// parent already has an earlier deadline
    pub fn with_deadline(&self, deadline: Instant) -> (Self, CancelHandle) {
        let (mut ctx, cancel) = self.with_cancel();
        ctx.deadline = Some(match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        });
        (ctx, cancel)
    }

    /// Derive a child context that expires `timeout` from now.
    ///
    /// A timeout too large to represent adds no deadline of its own.
    pub fn with_timeout(&self, timeout: Duration) -> (Self, CancelHandle) {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.with_cancel(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Reason the context is done, or `None` while it is still live.
    ///
    /// Reports whichever happened first: the deadline passing or a
    /// cancellation of this context or an ancestor.
    pub fn err(&self) -> Option<ContextError> {
        let expired_by = |at: Instant| matches!(self.deadline, Some(deadline) if at >= deadline);

        if self.token.is_cancelled() {
            let canceled_at = self.record.earliest().unwrap_or_else(Instant::now);
            return Some(if expired_by(canceled_at) {
                ContextError::DeadlineExceeded
            } else {
                ContextError::Canceled
            });
        }
        expired_by(Instant::now()).then_some(ContextError::DeadlineExceeded)
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Wait until the context is canceled or its deadline passes
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
