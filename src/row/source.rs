//! Row cursors and the in-memory and cancellable sources.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SourceError;

use super::Row;

/// A one-pass cursor over the rows of a split.
///
/// `advance` moves to the next row and may block on I/O. After it returns
/// `Ok(true)`, `current` yields that row until the next advance.
pub trait RowSource {
    /// Moves the cursor forward by one row. Returns `Ok(false)` at end of split.
    fn advance(&mut self) -> Result<bool, SourceError>;

    /// The row under the cursor, if any.
    fn current(&self) -> Option<&Row>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn advance(&mut self) -> Result<bool, SourceError> {
        (**self).advance()
    }

    fn current(&self) -> Option<&Row> {
        (**self).current()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn advance(&mut self) -> Result<bool, SourceError> {
        (**self).advance()
    }

    fn current(&self) -> Option<&Row> {
        (**self).current()
    }
}

/// Rows held in memory, yielded in insertion order.
#[derive(Debug, Default)]
pub struct VecRowSource {
    pending: VecDeque<Row>,
    current: Option<Row>,
}

impl VecRowSource {
    /// Creates a source over `rows`.
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            pending: rows.into_iter().collect(),
            current: None,
        }
    }

    /// Rows not yet reached by the cursor.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl RowSource for VecRowSource {
    fn advance(&mut self) -> Result<bool, SourceError> {
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }
}

/// Shared cancellation signal for a running split.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; observed on the next cursor advance.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Wraps a source so that advancing fails with [`SourceError::Cancelled`]
/// once the flag is set.
#[derive(Debug)]
pub struct Cancellable<S> {
    inner: S,
    flag: CancelFlag,
    cancelled: bool,
}

impl<S: RowSource> Cancellable<S> {
    /// Wraps `inner`, observing `flag`.
    pub fn new(inner: S, flag: CancelFlag) -> Self {
        Self {
            inner,
            flag,
            cancelled: false,
        }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RowSource> RowSource for Cancellable<S> {
    fn advance(&mut self) -> Result<bool, SourceError> {
        if self.flag.is_cancelled() {
            self.cancelled = true;
            return Err(SourceError::Cancelled);
        }
        self.inner.advance()
    }

    fn current(&self) -> Option<&Row> {
        if self.cancelled {
            return None;
        }
        self.inner.current()
    }
}
