//! Cancellation signals
//!
//! Two independent authorities can stop a poll:
//! - [`RootSignal`]: lives as long as the process (or workflow) and is shared
//!   by every poll on a [`Poller`](crate::Poller)
//! - [`OperationSignal`]: scoped to a single poll call, optionally with a
//!   deadline
//!
//! Both expose a `done()` receiver that becomes ready (disconnected) once the
//! signal is cancelled, so they can take part in a `crossbeam` `select!`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::OperationError;

/// One-shot broadcast: firing drops the only sender, which wakes every
/// receiver that is blocked on (or later selects on) the channel.
struct Trigger {
    fired: AtomicBool,
    tx: Mutex<Option<Sender<()>>>,
    rx: Receiver<()>,
}

impl Trigger {
    fn new() -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            fired: AtomicBool::new(false),
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    /// Returns true if this call was the one that fired the trigger
    fn fire(&self) -> bool {
        let Some(sender) = self.tx.lock().take() else {
            return false;
        };
        // Flag before disconnect: anyone woken by the channel sees it set
        self.fired.store(true, Ordering::Release);
        drop(sender);
        true
    }

    fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Process-wide cancellation source.
///
/// Cheap to clone; all clones observe the same state. A poller only ever
/// reads it, the embedding application decides when to cancel (for example
/// on Ctrl-C).
///
/// # Example
///
/// ```rust
/// use pollwait::RootSignal;
///
/// let root = RootSignal::new();
/// let shared = root.clone();
/// assert!(!shared.is_cancelled());
///
/// root.cancel();
/// assert!(shared.is_cancelled());
/// ```
#[derive(Clone)]
pub struct RootSignal {
    inner: Arc<Trigger>,
}

impl RootSignal {
    /// Create a new, uncancelled root signal
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Trigger::new()),
        }
    }

    /// Cancel the signal. Idempotent.
    pub fn cancel(&self) {
        self.inner.fire();
    }

    /// Whether the signal has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_fired()
    }

    /// Receiver that becomes ready once the signal is cancelled.
    ///
    /// Nothing is ever sent on it; readiness is the channel disconnecting.
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.rx
    }
}

impl Default for RootSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RootSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

struct OperationInner {
    trigger: Trigger,
    deadline: Option<Instant>,
    // First cause wins
    cause: Mutex<Option<OperationError>>,
}

/// Cancellation/timeout source for a single poll call.
///
/// Clones share state, so a signal handed to [`Poller::poll`](crate::Poller::poll)
/// can be cancelled from another thread.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use pollwait::{OperationError, OperationSignal};
///
/// let op = OperationSignal::with_timeout(Duration::from_secs(30));
/// assert_eq!(op.error(), None);
///
/// op.cancel();
/// assert_eq!(op.error(), Some(OperationError::Cancelled));
/// ```
#[derive(Clone)]
pub struct OperationSignal {
    inner: Arc<OperationInner>,
}

impl OperationSignal {
    /// Signal without a deadline; only `cancel()` fires it
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Signal that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout))
    }

    /// Signal that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    fn build(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(OperationInner {
                trigger: Trigger::new(),
                deadline,
                cause: Mutex::new(None),
            }),
        }
    }

    /// Cancel the operation.
    ///
    /// If the deadline already passed, the recorded error stays
    /// `DeadlineExceeded`.
    pub fn cancel(&self) {
        {
            let mut cause = self.inner.cause.lock();
            if cause.is_none() {
                *cause = Some(if self.deadline_passed() {
                    OperationError::DeadlineExceeded
                } else {
                    OperationError::Cancelled
                });
            }
        }
        self.inner.trigger.fire();
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Time left until the deadline; `None` without a deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Why the signal fired, or `None` while it is still live
    pub fn error(&self) -> Option<OperationError> {
        let mut cause = self.inner.cause.lock();
        if cause.is_none() && self.deadline_passed() {
            *cause = Some(OperationError::DeadlineExceeded);
        }
        *cause
    }

    /// Whether the signal has fired for any reason
    pub fn is_done(&self) -> bool {
        self.error().is_some()
    }

    /// Receiver that becomes ready once `cancel()` is called.
    ///
    /// Deadline expiry is not reflected here; see [`expiry`](Self::expiry).
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.trigger.rx
    }

    /// Fresh timer channel that delivers once at the deadline, or never.
    ///
    /// Each call allocates its own timer; dropping the receiver releases it.
    pub fn expiry(&self) -> Receiver<Instant> {
        match self.inner.deadline {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        }
    }

    fn deadline_passed(&self) -> bool {
        self.inner
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Default for OperationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSignal")
            .field("deadline", &self.inner.deadline)
            .field("error", &self.error())
            .finish()
    }
}
