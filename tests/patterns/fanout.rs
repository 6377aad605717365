//! Wide fan-out: one source broadcasting to many sinks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use test_case::test_case;
use weft::Scheduler;

#[test_case(0; "zero_workers")]
#[test_case(4; "four_workers")]
fn source_broadcasts_to_100_sinks(workers: usize) {
    let source_ran = Arc::new(AtomicBool::new(false));
    let counter = Arc::new(AtomicUsize::new(0));

    let flow = Scheduler::new(workers);

    let flag = Arc::clone(&source_ran);
    let source = flow
        .silent_emplace(move || flag.store(true, Ordering::SeqCst))
        .name("S");

    // A panic inside a silent task would be discarded, so sinks record an
    // ordering violation instead of asserting in the body.
    let ran_before_source = Arc::new(AtomicBool::new(false));
    let sinks: Vec<_> = (0..100)
        .map(|_| {
            let flag = Arc::clone(&source_ran);
            let violation = Arc::clone(&ran_before_source);
            let counter = Arc::clone(&counter);
            flow.silent_emplace(move || {
                if !flag.load(Ordering::SeqCst) {
                    violation.store(true, Ordering::SeqCst);
                }
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();
    source.broadcast(sinks);

    flow.wait_for_all();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
    assert!(!ran_before_source.load(Ordering::SeqCst));
}

#[test]
fn fan_in_waits_for_every_input() {
    let counter = Arc::new(AtomicUsize::new(0));

    let flow = Scheduler::new(4);

    let feeders: Vec<_> = (0..32)
        .map(|_| {
            let counter = Arc::clone(&counter);
            flow.silent_emplace(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    let counter_at_join = Arc::clone(&counter);
    let (join, observed) = flow.emplace(move || counter_at_join.load(Ordering::SeqCst));
    join.gather(feeders);

    flow.wait_for_all();
    assert_eq!(observed.get(), 32);
}
