//! Property checks for the poll loop
//!
//! Case counts stay small: every case sleeps for real.

use std::time::Duration;

use pollwait::{OperationSignal, PollError, Poller, RootSignal};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn succeeds_on_the_first_done_check(done_on in 1u64..6, interval_ms in 1u64..4) {
        let poller = Poller::new(RootSignal::new(), Duration::from_millis(interval_ms)).unwrap();
        let op = OperationSignal::with_timeout(Duration::from_secs(10));

        let mut calls = 0u64;
        let outcome = poller.poll(&op, || {
            calls += 1;
            Ok::<_, String>(calls >= done_on)
        });

        prop_assert_eq!(outcome.result, Ok(()));
        prop_assert_eq!(outcome.attempts, done_on);
        prop_assert!(outcome.elapsed >= Duration::from_millis(interval_ms * (done_on - 1)));
    }

    #[test]
    fn failing_checks_never_yield_success(fail_every in 1u64..4) {
        let poller = Poller::new(RootSignal::new(), Duration::from_millis(1)).unwrap();
        let op = OperationSignal::with_timeout(Duration::from_millis(20));

        let mut calls = 0u64;
        let outcome = poller.poll(&op, || {
            calls += 1;
            if calls % fail_every == 0 {
                Err("flaky backend")
            } else {
                Ok(false)
            }
        });

        prop_assert!(matches!(outcome.result, Err(PollError::Operation(_))));
    }

    #[test]
    fn cancelled_root_always_aborts(op_cancelled in any::<bool>(), done in any::<bool>()) {
        let root = RootSignal::new();
        let poller = Poller::new(root.clone(), Duration::from_millis(1)).unwrap();
        let op = OperationSignal::new();
        if op_cancelled {
            op.cancel();
        }
        root.cancel();

        let outcome = poller.poll(&op, || Ok::<_, String>(done));

        prop_assert_eq!(outcome.result, Err(PollError::Aborted));
        prop_assert_eq!(outcome.attempts, 0);
    }
}
