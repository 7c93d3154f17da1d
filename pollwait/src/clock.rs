//! Time source for the poll loop

use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver};

/// Source of the current time and of one-shot timers.
///
/// The poll loop measures elapsed time with `now()` and waits between checks
/// on the receiver returned by `after()`.
///
/// Only those two concerns go through the clock. An
/// [`OperationSignal`](crate::OperationSignal) deadline is a wall-clock
/// `Instant` and always expires against `Instant::now()`, so a replacement
/// clock changes the reported `elapsed` and the tick spacing but never moves
/// a deadline.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Timer channel that delivers once after `delay`.
    ///
    /// Dropping the receiver releases the timer.
    fn after(&self, delay: Duration) -> Receiver<Instant>;
}

/// Wall clock backed by `crossbeam` timer channels
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn after(&self, delay: Duration) -> Receiver<Instant> {
        channel::after(delay)
    }
}
