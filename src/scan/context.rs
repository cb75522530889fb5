//! Cancellation and deadline propagation
//!
//! Every blocking channel operation in the pipeline goes through a
//! [`ScanContext`], which races the operation against an explicit cancel
//! and an optional wall-clock deadline. Cancelling drops the only sender of
//! an internal channel, so every thread parked in a `select!` on it wakes
//! up at once.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError, select};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Why a context stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    Cancelled,
    DeadlineExceeded,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::Cancelled => write!(f, "scan cancelled"),
            ContextError::DeadlineExceeded => write!(f, "scan deadline exceeded"),
        }
    }
}

/// Cheaply cloneable cancellation token shared by all pipeline threads
#[derive(Debug, Clone)]
pub struct ScanContext {
    done: Receiver<()>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    deadline: Option<Instant>,
}

impl ScanContext {
    /// A context that only ends when [`cancel`](Self::cancel) is called
    pub fn background() -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            done: rx,
            trigger: Arc::new(Mutex::new(Some(tx))),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::background()
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every clone of it. Idempotent.
    pub fn cancel(&self) {
        if let Ok(mut trigger) = self.trigger.lock() {
            trigger.take();
        }
    }

    fn is_cancelled(&self) -> bool {
        matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// `None` while the context is live
    pub fn error(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            Some(ContextError::Cancelled)
        } else if self.is_expired() {
            Some(ContextError::DeadlineExceeded)
        } else {
            None
        }
    }

    pub fn is_done(&self) -> bool {
        self.error().is_some()
    }

    fn deadline_channel(&self) -> Receiver<Instant> {
        match self.deadline {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        }
    }

    /// Send `item`, giving up if the context ends first.
    ///
    /// Returns `false` when the item was not delivered, either because the
    /// context ended or because every receiver is gone. Callers treat both
    /// the same way: stop producing.
    pub fn send<T>(&self, tx: &Sender<T>, item: T) -> bool {
        if self.is_done() {
            return false;
        }
        let deadline = self.deadline_channel();
        select! {
            send(tx, item) -> res => res.is_ok(),
            recv(self.done) -> _ => false,
            recv(deadline) -> _ => false,
        }
    }

    /// Receive the next item, or `None` once the channel is closed or the
    /// context ends.
    pub fn recv<T>(&self, rx: &Receiver<T>) -> Option<T> {
        if self.is_done() {
            return None;
        }
        let deadline = self.deadline_channel();
        select! {
            recv(rx) -> msg => msg.ok(),
            recv(self.done) -> _ => None,
            recv(deadline) -> _ => None,
        }
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::background()
    }
}
