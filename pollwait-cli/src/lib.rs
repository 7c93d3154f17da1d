//! Command line front end for pollwait
//!
//! Parses global flags (log level and format, poll interval, request
//! timeout), builds a [`checks::Check`] from the subcommand and blocks in
//! [`pollwait::Poller::poll`] until it passes.

pub mod args;
pub mod checks;
pub mod duration;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use pollwait::{OperationSignal, PollError, PollOutcome, Poller, RootSignal};

use args::{Args, Command};
use checks::{Check, FileCheck, HttpCheck, TcpCheck};

/// Exit status when the root signal (Ctrl-C) ended the wait
pub const EXIT_ABORTED: u8 = 130;

/// Exit status when the request timeout expired
pub const EXIT_TIMED_OUT: u8 = 1;

/// Longest single check attempt (TCP connect or HTTP request)
pub const MAX_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time budget for one check attempt.
///
/// A running check cannot be interrupted, so this also bounds how late Ctrl-C
/// or the request timeout can take effect.
pub fn attempt_timeout(args: &Args) -> Duration {
    args.poll_interval.min(MAX_ATTEMPT_TIMEOUT)
}

/// Build the check selected on the command line
pub fn build_check(args: &Args) -> Result<Check> {
    let check = match &args.command {
        Command::File { path, absent } => Check::File(if *absent {
            FileCheck::absent(path)
        } else {
            FileCheck::exists(path)
        }),
        Command::Tcp { address } => {
            Check::Tcp(TcpCheck::new(address.clone(), attempt_timeout(args)))
        }
        Command::Http { url, status } => Check::Http(
            HttpCheck::new(url.clone(), *status, attempt_timeout(args))
                .context("failed to create HTTP client")?,
        ),
    };
    Ok(check)
}

/// Wait for `check` on `poller`, bounded by the request timeout
pub fn wait(poller: &Poller, check: &Check, request_timeout: Duration) -> PollOutcome {
    tracing::info!(condition = %check, timeout = ?request_timeout, "waiting");
    let op = OperationSignal::with_timeout(request_timeout);
    poller.poll(&op, || check.check())
}

/// Process exit status for a finished wait
pub fn exit_status(outcome: &PollOutcome) -> u8 {
    match outcome.result {
        Ok(()) => 0,
        Err(PollError::Aborted) => EXIT_ABORTED,
        Err(PollError::Operation(_)) => EXIT_TIMED_OUT,
    }
}

/// Run the tool end to end
pub fn run(args: Args) -> Result<ExitCode> {
    args.validate()?;

    pollwait::logging::init_logging_with_level(args.log_format.into(), &args.log_level)
        .context("failed to initialize logging")?;

    let root = RootSignal::new();
    let handler_root = root.clone();
    ctrlc::set_handler(move || handler_root.cancel())
        .context("failed to install Ctrl-C handler")?;

    let poller = Poller::new(root, args.poll_interval).context("invalid --poll-interval")?;
    let check = build_check(&args)?;

    let outcome = wait(&poller, &check, args.request_timeout);
    match outcome.result {
        Ok(()) => println!("ready after {:?}", outcome.elapsed),
        Err(PollError::Aborted) => {
            tracing::warn!(elapsed = ?outcome.elapsed, "interrupted before {}", check);
        }
        Err(PollError::Operation(e)) => {
            tracing::error!(
                elapsed = ?outcome.elapsed,
                attempts = outcome.attempts,
                "gave up waiting for {}: {}",
                check,
                e
            );
        }
    }

    Ok(ExitCode::from(exit_status(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_attempt_timeout_follows_short_interval() {
        let args = args(&["pollwait", "--poll-interval", "250ms", "http", "http://localhost"]);
        assert_eq!(attempt_timeout(&args), Duration::from_millis(250));
    }

    #[test]
    fn test_attempt_timeout_is_capped() {
        // The request timeout never becomes the per-attempt budget
        let args = args(&[
            "pollwait",
            "--poll-interval",
            "1m",
            "--request-timeout",
            "10m",
            "http",
            "http://localhost",
        ]);
        assert_eq!(attempt_timeout(&args), MAX_ATTEMPT_TIMEOUT);
    }
}
