//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is cheap to clone and may be triggered from any
//! thread. The analyzer polls it between top-level items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Returned by [`CancellationToken::check`] once cancellation was requested
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("analysis cancelled")]
pub struct Cancelled;

/// Shared cancellation flag
///
/// # Examples
///
/// ```
/// use arcc_util::cancel::CancellationToken;
///
/// let token = CancellationToken::new();
/// let remote = token.clone();
/// assert!(token.check().is_ok());
/// remote.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// True once [`cancel`](Self::cancel) was called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation was requested
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
