//! Long linear chains: strict sequential order under any pool size.

use std::sync::Arc;

use parking_lot::Mutex;
use test_case::test_case;
use weft::Scheduler;

#[test_case(0; "zero_workers")]
#[test_case(1; "one_worker")]
#[test_case(4; "four_workers")]
fn chain_of_1000_runs_in_order(workers: usize) {
    let seen = Arc::new(Mutex::new(Vec::with_capacity(1000)));

    let flow = Scheduler::new(workers);
    let mut prev = None;
    for i in 0..1000usize {
        let seen = Arc::clone(&seen);
        let task = flow.silent_emplace(move || seen.lock().push(i));
        if let Some(prev) = prev {
            task.gather([prev]);
        }
        prev = Some(task);
    }
    flow.wait_for_all();

    let seen = seen.lock();
    assert_eq!(*seen, (0..1000).collect::<Vec<_>>());
}

#[test]
fn chain_tail_value_sees_all_predecessors() {
    let sum = Arc::new(Mutex::new(0u64));

    let flow = Scheduler::new(3);
    let mut prev = None;
    for i in 1..=100u64 {
        let sum = Arc::clone(&sum);
        let task = flow.silent_emplace(move || *sum.lock() += i);
        if let Some(prev) = prev {
            task.gather([prev]);
        }
        prev = Some(task);
    }

    let total = Arc::clone(&sum);
    let (tail, out) = flow.emplace(move || *total.lock());
    tail.gather([prev.unwrap()]);

    flow.wait_for_all();
    assert_eq!(out.get(), 5050);
}
