//! Caller-driven cancellation for in-flight fetches.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable cancellation signal.
///
/// All clones observe the same state. Once cancelled a token stays cancelled.
/// A cancelled fetch resolves as "no data", never as an error.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    armed: bool,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            armed: true,
        }
    }

    /// A token that never fires. [`cancel`](Self::cancel) is a no-op on it.
    pub fn none() -> Self {
        Self {
            armed: false,
            ..Self::new()
        }
    }

    pub fn cancel(&self) {
        if self.armed {
            self.tx.send_replace(true);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is cancelled. Pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `fut` unless the token fires first.
    ///
    /// Returns `None` when cancelled; `fut` is dropped at that point.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
