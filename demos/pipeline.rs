//! A small fetch/transform/combine pipeline with value-returning stages.
//!
//! Run with: `cargo run --example pipeline`

use std::sync::Arc;

use parking_lot::Mutex;
use weft::Scheduler;

fn main() {
    let flow = Scheduler::new(4);

    // Stage 1: two independent "fetches" stash their rows.
    let orders = Arc::new(Mutex::new(Vec::new()));
    let refunds = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&orders);
    let fetch_orders = flow
        .silent_emplace(move || sink.lock().extend([120, 80, 45]))
        .name("fetch-orders");
    let sink = Arc::clone(&refunds);
    let fetch_refunds = flow
        .silent_emplace(move || sink.lock().extend([20, 5]))
        .name("fetch-refunds");

    // Stage 2: totals, each gated on its fetch.
    let rows = Arc::clone(&orders);
    let (sum_orders, gross) = flow.emplace(move || rows.lock().iter().sum::<i64>());
    sum_orders.name("sum-orders").gather([fetch_orders]);

    let rows = Arc::clone(&refunds);
    let (sum_refunds, refunded) = flow.emplace(move || rows.lock().iter().sum::<i64>());
    sum_refunds.name("sum-refunds").gather([fetch_refunds]);

    println!("{}", flow.dump());
    println!("---");

    flow.wait_for_all();

    let net = gross.get() - refunded.get();
    println!("net revenue: {net}");
}
