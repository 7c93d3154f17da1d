//! Command line arguments

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pollwait::LoggingMode;

use crate::duration::parse_duration;

/// Block until a file, TCP listener or HTTP endpoint is ready.
///
/// The condition is checked immediately, then once per poll interval, until
/// it holds, the request timeout expires, or Ctrl-C is pressed.
#[derive(Parser, Debug)]
#[command(name = "pollwait")]
#[command(version)]
#[command(about = "Wait until a condition becomes true")]
pub struct Args {
    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "POLLWAIT_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Interval between checks (e.g. 500ms, 1s, 2m)
    #[arg(
        long,
        global = true,
        default_value = "1s",
        value_parser = parse_duration,
        env = "POLLWAIT_POLL_INTERVAL"
    )]
    pub poll_interval: Duration,

    /// Give up after this long
    #[arg(
        long,
        global = true,
        default_value = "2m",
        value_parser = parse_duration,
        env = "POLLWAIT_REQUEST_TIMEOUT"
    )]
    pub request_timeout: Duration,

    #[command(subcommand)]
    pub command: Command,
}

/// What to wait for
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Wait until a path exists
    File {
        path: PathBuf,

        /// Wait until the path no longer exists instead
        #[arg(long)]
        absent: bool,
    },

    /// Wait until a TCP connection to HOST:PORT succeeds
    Tcp { address: String },

    /// Wait until a GET request returns the expected status
    Http {
        url: String,

        /// Status code that counts as ready
        #[arg(long, default_value_t = 200)]
        status: u16,
    },
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable output
    Compact,
    /// Multi-line output with source locations
    Pretty,
    /// JSON lines
    Json,
}

impl From<LogFormat> for LoggingMode {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => LoggingMode::Development,
            LogFormat::Pretty => LoggingMode::Debug,
            LogFormat::Json => LoggingMode::Json,
        }
    }
}

impl Args {
    /// Validate values clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(anyhow!("--poll-interval must be positive"));
        }

        if self.request_timeout.is_zero() {
            return Err(anyhow!("--request-timeout must be positive"));
        }

        if let Command::Http { status, .. } = &self.command {
            if !(100..=599).contains(status) {
                return Err(anyhow!("Invalid --status {}: must be 100-599", status));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["pollwait", "tcp", "localhost:8080"]);
        assert_eq!(args.poll_interval, Duration::from_secs(1));
        assert_eq!(args.request_timeout, Duration::from_secs(120));
        assert_eq!(args.log_format, LogFormat::Compact);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&[
            "pollwait",
            "file",
            "/tmp/ready",
            "--absent",
            "--poll-interval",
            "250ms",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.poll_interval, Duration::from_millis(250));
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(matches!(args.command, Command::File { absent: true, .. }));
    }

    #[test]
    fn test_validation() {
        let args = parse(&["pollwait", "--poll-interval", "0s", "tcp", "localhost:1"]);
        assert!(args.validate().is_err());

        let args = parse(&["pollwait", "http", "http://localhost", "--status", "42"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_invalid_duration_rejected() {
        assert!(Args::try_parse_from(["pollwait", "--request-timeout", "soon", "tcp", "x:1"]).is_err());
    }

    #[test]
    fn test_log_format_to_mode() {
        assert_eq!(LoggingMode::from(LogFormat::Json), LoggingMode::Json);
        assert_eq!(LoggingMode::from(LogFormat::Pretty), LoggingMode::Debug);
    }
}
