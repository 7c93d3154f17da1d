//! The poll loop
//!
//! [`Poller::poll`] runs a caller-supplied check until it reports done, or
//! until the root signal or the per-call operation signal fires. Check errors
//! are logged and swallowed; only the three terminal outcomes reach the
//! caller.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{select, Receiver};

use crate::clock::{Clock, SystemClock};
use crate::config::PollerConfig;
use crate::error::{ConfigError, PollError};
use crate::signal::{OperationSignal, RootSignal};
use crate::sink::{LogSink, PollEvent, TracingSink};

/// Result of a single [`Poller::poll`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Wall-clock time from the start of the call to its return
    pub elapsed: Duration,

    /// Number of times the check function was invoked
    pub attempts: u64,

    /// `Ok(())` when the check reported done
    pub result: Result<(), PollError>,
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The terminal error, if the poll did not succeed
    pub fn error(&self) -> Option<PollError> {
        self.result.err()
    }

    /// Elapsed time on success, the terminal error otherwise
    pub fn into_result(self) -> Result<Duration, PollError> {
        self.result.map(|()| self.elapsed)
    }
}

/// Polls a check function on a fixed interval.
///
/// Holds only immutable configuration, so a single instance (or its clones)
/// can serve any number of concurrent `poll` calls, one per thread.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use pollwait::{OperationSignal, Poller, RootSignal};
///
/// let poller = Poller::new(RootSignal::new(), Duration::from_millis(5)).unwrap();
/// let op = OperationSignal::with_timeout(Duration::from_secs(5));
///
/// let mut calls = 0;
/// let outcome = poller.poll(&op, || {
///     calls += 1;
///     Ok::<_, std::io::Error>(calls == 3)
/// });
///
/// assert!(outcome.is_success());
/// assert_eq!(outcome.attempts, 3);
/// ```
#[derive(Clone)]
pub struct Poller {
    root: RootSignal,
    interval: Duration,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn LogSink>,
}

impl Poller {
    /// Create a poller bound to `root`, checking every `interval`.
    ///
    /// Fails if `interval` is zero. Starts no background activity.
    pub fn new(root: RootSignal, interval: Duration) -> Result<Self, ConfigError> {
        Self::with_config(root, PollerConfig::new().with_interval(interval))
    }

    /// Create a poller from a full configuration
    pub fn with_config(root: RootSignal, config: PollerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            root,
            interval: config.interval,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the log sink
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn root(&self) -> &RootSignal {
        &self.root
    }

    /// Poll `check` until it returns `Ok(true)`.
    ///
    /// The first check runs immediately; each following check starts one
    /// interval after the previous one returned. `Err` from the check is
    /// logged at warn level and polling continues.
    ///
    /// Terminal outcomes:
    /// - `Ok(())` once the check reports done
    /// - `Err(PollError::Aborted)` if the root signal fired, whether or not
    ///   `op` fired too
    /// - `Err(PollError::Operation(e))` if only `op` fired, with `e` being
    ///   exactly `op.error()`
    pub fn poll<F, E>(&self, op: &OperationSignal, mut check: F) -> PollOutcome
    where
        F: FnMut() -> Result<bool, E>,
        E: fmt::Display,
    {
        let start = self.clock.now();
        self.sink.record(&PollEvent::Started {
            interval: self.interval,
        });

        // Lives for the whole call; released on return
        let expiry = op.expiry();
        let mut attempts: u64 = 0;
        let mut first = true;

        let result = loop {
            if first {
                first = false;
            } else {
                self.wait_for_tick(op, &expiry);
            }

            // Re-evaluated after every wake-up, so a signal that fired while
            // waiting never lets the check run
            if let Some(err) = self.interruption(op) {
                break Err(err);
            }

            attempts += 1;
            match check() {
                Ok(true) => break Ok(()),
                Ok(false) => {}
                Err(error) => {
                    self.sink.record(&PollEvent::CheckFailed {
                        attempt: attempts,
                        error: &error,
                    });
                }
            }
        };

        let elapsed = self.elapsed_since(start);
        if result.is_ok() {
            self.sink.record(&PollEvent::Confirmed {
                took: elapsed,
                attempts,
            });
        }

        PollOutcome {
            elapsed,
            attempts,
            result,
        }
    }

    /// Block until one interval has passed or either signal fires
    fn wait_for_tick(&self, op: &OperationSignal, expiry: &Receiver<Instant>) {
        // Per-iteration timer, dropped on every path out of this function
        let tick = self.clock.after(self.interval);

        select! {
            recv(self.root.done()) -> _ => {}
            recv(op.done()) -> _ => {}
            recv(expiry) -> _ => {}
            recv(tick) -> _ => {}
        }
    }

    /// Which signal, if any, stops the loop.
    ///
    /// The root signal is read last so that it still wins if it fires
    /// between the two reads.
    fn interruption(&self, op: &OperationSignal) -> Option<PollError> {
        let op_error = op.error();
        if self.root.is_cancelled() {
            return Some(PollError::Aborted);
        }
        op_error.map(PollError::Operation)
    }

    fn elapsed_since(&self, start: Instant) -> Duration {
        self.clock.now().saturating_duration_since(start)
    }
}

impl fmt::Debug for Poller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("root", &self.root)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
