use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::watch;

use crate::{Result, SortVizError};

/// Step delay shared between the controls and a running engine. The engine
/// reads it at every pause, so changes apply to the very next step.
#[derive(Debug, Clone, Default)]
pub struct DelayHandle {
    millis: Arc<AtomicU64>,
}

impl DelayHandle {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    pub fn get(&self) -> u64 {
        self.millis.load(Ordering::Relaxed)
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Relaxed);
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.get())
    }
}

/// Cancellation flag for a single sort run.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives in `self`, so `wait_for` can only fail after every
        // token clone was dropped, which cannot happen while we hold one.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Cooperative suspension point between two visible algorithm steps.
#[derive(Debug, Clone, Default)]
pub struct Pacer {
    delay: DelayHandle,
    token: CancelToken,
}

impl Pacer {
    pub fn new(delay: DelayHandle, token: CancelToken) -> Self {
        Self { delay, token }
    }

    /// Pacer with a fixed delay and a token nobody else can cancel.
    pub fn fixed(millis: u64) -> Self {
        Self::new(DelayHandle::new(millis), CancelToken::new())
    }

    pub fn delay(&self) -> &DelayHandle {
        &self.delay
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Suspends for the current delay. A zero delay still yields once so other
    /// tasks (and the surface) get a turn.
    pub async fn pause(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(SortVizError::Cancelled);
        }

        let delay = self.delay.duration();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.token.cancelled() => return Err(SortVizError::Cancelled),
            }
        }

        if self.token.is_cancelled() {
            Err(SortVizError::Cancelled)
        } else {
            Ok(())
        }
    }
}
