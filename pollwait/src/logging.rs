//! Logging setup for applications embedding pollwait
//!
//! The poller itself only talks to its [`LogSink`](crate::LogSink). With the
//! default [`TracingSink`](crate::TracingSink) those entries go through
//! `tracing`, and this module installs a `tracing-subscriber` to print them.

use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::LoggingError;

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber at all
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with thread ids and source locations
    Debug,
    /// One JSON object per line, for log collectors
    Json,
}

impl LoggingMode {
    /// Mode named by a `POLLWAIT_LOG_MODE` value:
    /// - "development" -> LoggingMode::Development
    /// - "debug" -> LoggingMode::Debug
    /// - "json" -> LoggingMode::Json
    ///
    /// Anything else, or no value, means silent.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("development") => LoggingMode::Development,
            Some("debug") => LoggingMode::Debug,
            Some("json") => LoggingMode::Json,
            _ => LoggingMode::Silent,
        }
    }

    fn default_level(self) -> &'static str {
        match self {
            LoggingMode::Debug => "debug",
            _ => "info",
        }
    }
}

/// Initialize logging with the specified mode
///
/// The filter comes from `POLLWAIT_LOG_LEVEL`, then `RUST_LOG`, then the
/// mode's default level.
///
/// # Examples
///
/// ```rust,ignore
/// pollwait::logging::init_logging(LoggingMode::Development)?;
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let filter = create_env_filter(mode.default_level())?;
    install(mode, filter)
}

/// Initialize logging with an explicit filter directive such as `"warn"` or
/// `"pollwait=debug,info"`, ignoring the environment
pub fn init_logging_with_level(mode: LoggingMode, level: &str) -> Result<(), LoggingError> {
    let filter = parse_filter(level)?;
    install(mode, filter)
}

/// Initialize logging from environment variables
///
/// Reads `POLLWAIT_LOG_MODE`; see [`LoggingMode::from_env_value`] for the
/// accepted values. Unset means silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let value = std::env::var("POLLWAIT_LOG_MODE").ok();
    init_logging(LoggingMode::from_env_value(value.as_deref()))
}

fn install(mode: LoggingMode, filter: EnvFilter) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
        LoggingMode::Json => Registry::default()
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
    }
}

/// Create an environment filter with fallback to default level
fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(level) = std::env::var("POLLWAIT_LOG_LEVEL") {
        parse_filter(&level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        parse_filter(&rust_log)
    } else {
        parse_filter(default_level)
    }
}

fn parse_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}
