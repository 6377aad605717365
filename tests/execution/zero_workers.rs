//! Zero-worker mode: the calling thread drains the graph itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft::Scheduler;

use crate::common::{event_log, labels, record};

/// Build the same two-layer graph on a scheduler and return the label order
/// plus the sum the sink observed.
fn run_reference_graph(workers: usize) -> (Vec<String>, usize) {
    let log = event_log();
    let counter = Arc::new(AtomicUsize::new(0));

    let flow = Scheduler::new(workers);
    let head = flow.silent_emplace(record(&log, "head"));
    let mids: Vec<_> = (0..10)
        .map(|i| {
            let counter = Arc::clone(&counter);
            let log = record(&log, &format!("mid{i}"));
            flow.silent_emplace(move || {
                counter.fetch_add(i, Ordering::SeqCst);
                log();
            })
        })
        .collect();
    head.broadcast(mids.clone());

    let counter_at_tail = Arc::clone(&counter);
    let (tail, out) = flow.emplace(move || counter_at_tail.load(Ordering::SeqCst));
    tail.gather(mids);

    flow.wait_for_all();
    (labels(&log), out.get())
}

#[test]
fn zero_workers_match_parallel_results() {
    let (serial_order, serial_sum) = run_reference_graph(0);
    let (parallel_order, parallel_sum) = run_reference_graph(4);

    // Same observable outcome; only the interleaving may differ.
    assert_eq!(serial_sum, 45);
    assert_eq!(parallel_sum, 45);
    assert_eq!(serial_order.len(), parallel_order.len());
    assert_eq!(serial_order.first(), parallel_order.first());
}

#[test]
fn zero_worker_dispatch_defers_to_wait_for_all() {
    let counter = Arc::new(AtomicUsize::new(0));

    let flow = Scheduler::new(0);
    let c = Arc::clone(&counter);
    flow.silent_emplace(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    flow.silent_dispatch();
    // No worker exists, so nothing has run yet.
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    flow.wait_for_all();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn zero_worker_mode_runs_chained_topologies() {
    let counter = Arc::new(AtomicUsize::new(0));

    let flow = Scheduler::new(0);
    for _ in 0..3 {
        let c = Arc::clone(&counter);
        flow.silent_emplace(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        flow.silent_dispatch();
    }
    flow.wait_for_all();
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}
