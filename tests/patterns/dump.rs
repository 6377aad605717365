//! Dump format checks.

use weft::Scheduler;

#[test]
fn dump_matches_fixed_format() {
    let flow = Scheduler::new(0);
    let a = flow.silent_emplace(|| {}).name("A");
    let b = flow.silent_emplace(|| {}).name("B");
    a.precede(b);

    assert_eq!(
        flow.dump(),
        "Task \"A\" [dependents:0|successors:1]\n  \
         |--> task \"B\"\n\
         Task \"B\" [dependents:1|successors:0]"
    );
    flow.wait_for_all();
}

#[test]
fn dump_lists_nodes_in_insertion_order() {
    let flow = Scheduler::new(0);
    let first = flow.silent_emplace(|| {}).name("first");
    let second = flow.silent_emplace(|| {}).name("second");
    let third = flow.silent_emplace(|| {}).name("third");
    third.gather([first, second]);

    let dump = flow.dump();
    let first_at = dump.find("Task \"first\"").unwrap();
    let second_at = dump.find("Task \"second\"").unwrap();
    let third_at = dump.find("Task \"third\"").unwrap();
    assert!(first_at < second_at && second_at < third_at);
    flow.wait_for_all();
}

#[test]
fn dump_shows_unnamed_tasks_with_empty_name() {
    let flow = Scheduler::new(0);
    flow.silent_emplace(|| {});
    assert_eq!(flow.dump(), "Task \"\" [dependents:0|successors:0]");
    flow.wait_for_all();
}

#[test]
fn dump_is_cleared_by_dispatch() {
    let flow = Scheduler::new(1);
    flow.silent_emplace(|| {}).name("gone");
    flow.silent_dispatch();
    assert_eq!(flow.dump(), "");
    flow.wait_for_all();
}
