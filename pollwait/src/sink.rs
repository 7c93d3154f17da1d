//! Structured log side-channel of the poll loop
//!
//! The poller never talks to a logging backend directly. It hands
//! [`PollEvent`]s to an injected [`LogSink`]; the default [`TracingSink`]
//! forwards them to `tracing`.

use std::fmt;
use std::time::Duration;

use tracing::Level;

/// A structured entry emitted by [`Poller::poll`](crate::Poller::poll)
#[derive(Clone, Copy)]
pub enum PollEvent<'a> {
    /// Polling started
    Started { interval: Duration },

    /// The check function returned an error; polling continues
    CheckFailed {
        attempt: u64,
        error: &'a dyn fmt::Display,
    },

    /// The check function reported done
    Confirmed { took: Duration, attempts: u64 },
}

impl PollEvent<'_> {
    /// Severity of the entry
    pub fn level(&self) -> Level {
        match self {
            PollEvent::Started { .. } | PollEvent::Confirmed { .. } => Level::INFO,
            PollEvent::CheckFailed { .. } => Level::WARN,
        }
    }

    /// Human readable message, without the fields
    pub fn message(&self) -> &'static str {
        match self {
            PollEvent::Started { .. } => "start polling",
            PollEvent::CheckFailed { .. } => "poll check failed",
            PollEvent::Confirmed { .. } => "poll confirmed",
        }
    }
}

impl fmt::Debug for PollEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollEvent::Started { interval } => f
                .debug_struct("Started")
                .field("interval", interval)
                .finish(),
            PollEvent::CheckFailed { attempt, error } => f
                .debug_struct("CheckFailed")
                .field("attempt", attempt)
                .field("error", &format_args!("{}", error))
                .finish(),
            PollEvent::Confirmed { took, attempts } => f
                .debug_struct("Confirmed")
                .field("took", took)
                .field("attempts", attempts)
                .finish(),
        }
    }
}

/// Receiver of leveled, structured poll entries
pub trait LogSink: Send + Sync {
    fn record(&self, event: &PollEvent<'_>);
}

/// Forwards poll entries to `tracing` under the `pollwait::poller` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, event: &PollEvent<'_>) {
        let message = event.message();
        match *event {
            PollEvent::Started { interval } => {
                tracing::info!(target: "pollwait::poller", interval = ?interval, "{}", message);
            }
            PollEvent::CheckFailed { attempt, error } => {
                tracing::warn!(
                    target: "pollwait::poller",
                    attempt,
                    error = %error,
                    "{}",
                    message
                );
            }
            PollEvent::Confirmed { took, attempts } => {
                tracing::info!(
                    target: "pollwait::poller",
                    took = ?took,
                    attempts,
                    "{}",
                    message
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_levels() {
        let error = "boom";
        assert_eq!(
            PollEvent::Started { interval: Duration::from_secs(1) }.level(),
            Level::INFO
        );
        assert_eq!(
            PollEvent::CheckFailed { attempt: 1, error: &error }.level(),
            Level::WARN
        );
        assert_eq!(
            PollEvent::Confirmed { took: Duration::ZERO, attempts: 1 }.level(),
            Level::INFO
        );
    }

    #[test]
    fn test_event_debug_includes_error_text() {
        let error = "connection refused";
        let event = PollEvent::CheckFailed { attempt: 3, error: &error };
        let debug = format!("{:?}", event);
        assert!(debug.contains("connection refused"));
        assert!(debug.contains("attempt: 3"));
        assert_eq!(event.message(), "poll check failed");
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: recording must be a silent no-op
        let error = "transient";
        TracingSink.record(&PollEvent::CheckFailed { attempt: 1, error: &error });
    }
}
