//! # pollwait
//!
//! Block until a condition becomes true, without writing the retry and
//! cancellation plumbing yourself.
//!
//! A [`Poller`] repeatedly runs a caller-supplied check until it returns
//! `Ok(true)`. Two independent signals can stop it early:
//!
//! - a [`RootSignal`] shared by every poll, usually cancelled on shutdown;
//!   it always wins and yields [`PollError::Aborted`]
//! - an [`OperationSignal`] passed to each call, carrying that call's
//!   deadline; its own [`OperationError`] is returned unchanged
//!
//! Errors returned by the check are transient: they are logged through the
//! poller's [`LogSink`] and polling carries on.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use pollwait::{OperationError, OperationSignal, PollError, Poller, RootSignal};
//!
//! let root = RootSignal::new();
//! let poller = Poller::new(root.clone(), Duration::from_millis(10)).unwrap();
//!
//! // Never done: the operation deadline ends the poll
//! let op = OperationSignal::with_timeout(Duration::from_millis(50));
//! let outcome = poller.poll(&op, || Ok::<_, std::io::Error>(false));
//!
//! assert_eq!(
//!     outcome.result,
//!     Err(PollError::Operation(OperationError::DeadlineExceeded))
//! );
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod signal;
pub mod sink;

pub use clock::{Clock, SystemClock};
pub use config::PollerConfig;
pub use error::{ConfigError, LoggingError, OperationError, PollError};
pub use logging::LoggingMode;
pub use poller::{PollOutcome, Poller};
pub use signal::{OperationSignal, RootSignal};
pub use sink::{LogSink, PollEvent, TracingSink};
