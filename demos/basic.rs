//! The classic diamond: A fans out to B and C, which rejoin at D.
//!
//! Run with: `cargo run --example basic`

use weft::Scheduler;

fn main() {
    let flow = Scheduler::new(4);

    let a = flow.silent_emplace(|| println!("TaskA")).name("A");
    let b = flow.silent_emplace(|| println!("TaskB")).name("B");
    let c = flow.silent_emplace(|| println!("TaskC")).name("C");
    let d = flow.silent_emplace(|| println!("TaskD")).name("D");

    a.precede(b);
    a.precede(c);
    b.precede(d);
    c.precede(d);

    println!("{}", flow.dump());
    println!("---");

    flow.wait_for_all();
}
