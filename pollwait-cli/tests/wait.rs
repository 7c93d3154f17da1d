//! Waiting on real files and sockets through the CLI building blocks

use std::fs;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use clap::Parser;
use pollwait::{OperationError, PollError, Poller, RootSignal};
use pollwait_cli::args::Args;
use pollwait_cli::{build_check, exit_status, wait, EXIT_ABORTED, EXIT_TIMED_OUT};

fn args(argv: &[&str]) -> Args {
    let mut full = vec!["pollwait", "--poll-interval", "10ms", "--request-timeout", "2s"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full).unwrap()
}

fn poller(args: &Args) -> Poller {
    Poller::new(RootSignal::new(), args.poll_interval).unwrap()
}

#[test]
fn test_waits_for_file_to_appear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ready.flag");
    let args = args(&["file", path.to_str().unwrap()]);
    let check = build_check(&args).unwrap();

    let writer_path = path.clone();
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        fs::write(writer_path, b"ok").unwrap();
    });

    let outcome = wait(&poller(&args), &check, args.request_timeout);
    writer.join().unwrap();

    assert_eq!(outcome.result, Ok(()));
    assert!(outcome.attempts > 1);
    assert_eq!(exit_status(&outcome), 0);
}

#[test]
fn test_waits_for_file_to_be_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lock");
    fs::write(&path, b"held").unwrap();
    let args = args(&["file", path.to_str().unwrap(), "--absent"]);
    let check = build_check(&args).unwrap();

    let remover_path = path.clone();
    let remover = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        fs::remove_file(remover_path).unwrap();
    });

    let outcome = wait(&poller(&args), &check, args.request_timeout);
    remover.join().unwrap();

    assert_eq!(outcome.result, Ok(()));
}

#[test]
fn test_missing_file_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never");
    let args = args(&["file", path.to_str().unwrap()]);
    let check = build_check(&args).unwrap();

    let outcome = wait(&poller(&args), &check, Duration::from_millis(60));

    assert_eq!(
        outcome.result,
        Err(PollError::Operation(OperationError::DeadlineExceeded))
    );
    assert_eq!(exit_status(&outcome), EXIT_TIMED_OUT);
}

#[test]
fn test_tcp_listener_is_ready() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let args = args(&["tcp", address.as_str()]);
    let check = build_check(&args).unwrap();

    let outcome = wait(&poller(&args), &check, args.request_timeout);

    assert_eq!(outcome.result, Ok(()));
    assert_eq!(outcome.attempts, 1);
}

#[test]
fn test_tcp_closed_port_times_out() {
    // Bind then drop to get a port nobody listens on
    let address = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let args = args(&["tcp", address.as_str()]);
    let check = build_check(&args).unwrap();

    let outcome = wait(&poller(&args), &check, Duration::from_millis(80));

    assert!(matches!(outcome.result, Err(PollError::Operation(_))));
}

#[test]
fn test_aborted_wait_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never");
    let args = args(&["file", path.to_str().unwrap()]);
    let check = build_check(&args).unwrap();

    let root = RootSignal::new();
    let poller = Poller::new(root.clone(), args.poll_interval).unwrap();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        root.cancel();
    });

    let outcome = wait(&poller, &check, args.request_timeout);
    canceller.join().unwrap();

    assert_eq!(outcome.result, Err(PollError::Aborted));
    assert_eq!(exit_status(&outcome), EXIT_ABORTED);
}
