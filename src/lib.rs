//! Thread-pool executor for DAGs of dependent tasks.
//!
//! `weft` lets an application express a computation as a directed acyclic
//! graph of side-effecting work units, then executes that graph in parallel
//! on a fixed pool of worker threads while respecting the declared partial
//! order. Tasks are plain closures; dependencies are wired through cheap,
//! copyable handles; values produced by tasks come back through one-shot
//! result channels.
//!
//! # Quick Start
//!
//! ```
//! use weft::Scheduler;
//!
//! let flow = Scheduler::new(4);
//!
//! let a = flow.silent_emplace(|| println!("TaskA")).name("A");
//! let b = flow.silent_emplace(|| println!("TaskB")).name("B");
//! let c = flow.silent_emplace(|| println!("TaskC")).name("C");
//! let d = flow.silent_emplace(|| println!("TaskD")).name("D");
//!
//! // A runs first, B and C in parallel, D last.
//! a.precede(b);
//! a.precede(c);
//! b.precede(d);
//! c.precede(d);
//!
//! flow.wait_for_all();
//! ```
//!
//! # Core Concepts
//!
//! ## Scheduler
//!
//! The [`Scheduler`] owns the worker pool and the graph under construction.
//! [`Scheduler::dispatch`] captures the current graph as a *topology* and
//! hands it to the pool; a fresh graph immediately starts accumulating for
//! the next dispatch. [`Scheduler::wait_for_all`] dispatches whatever is
//! pending and blocks until every in-flight topology has drained, after
//! which the scheduler can be reused.
//!
//! Construction with **zero workers** is legal and is the recommended debug
//! mode: the calling thread executes every task itself inside
//! `wait_for_all`, with identical results up to interleaving.
//!
//! ## Handles
//!
//! Emplacing a closure returns a [`TaskHandle`], a `Copy` reference into the
//! current graph. Handles wire dependencies and chain:
//!
//! ```
//! use weft::Scheduler;
//!
//! let flow = Scheduler::new(2);
//! let stage = flow.silent_emplace(|| {}).name("stage");
//! let post1 = flow.silent_emplace(|| {});
//! let post2 = flow.silent_emplace(|| {});
//! let prep = flow.silent_emplace(|| {});
//!
//! stage.broadcast([post1, post2]).gather([prep]);
//! flow.wait_for_all();
//! ```
//!
//! A handle is valid until its graph is dispatched; wiring with a stale
//! handle, or across two schedulers, panics.
//!
//! ## Result channels
//!
//! [`Scheduler::emplace`] pairs every handle with a [`TaskOutput`], a
//! one-shot blocking channel carrying the closure's return value:
//!
//! ```
//! use weft::Scheduler;
//!
//! let flow = Scheduler::new(2);
//! let (_h, answer) = flow.emplace(|| 6 * 7);
//! flow.dispatch();
//! assert_eq!(answer.get(), 42);
//! ```
//!
//! If the task body panics, the panic is captured into the channel:
//! [`TaskOutput::get`] re-raises it, while [`TaskOutput::wait`] returns a
//! [`TaskError::Panicked`] value instead. The rest of the graph keeps
//! running either way — downstream tasks are not cancelled.
//!
//! Both `emplace` flavors also accept a tuple of closures (up to 8) and
//! return their handles positionally:
//!
//! ```
//! use weft::Scheduler;
//!
//! let flow = Scheduler::new(2);
//! let ((_a, x), (_b, y)) = flow.emplace((|| 1, || 2));
//! flow.wait_for_all();
//! assert_eq!(x.get() + y.get(), 3);
//! ```
//!
//! ## Dump
//!
//! [`Scheduler::dump`] renders the graph built so far:
//!
//! ```
//! use weft::Scheduler;
//!
//! let flow = Scheduler::new(0);
//! let a = flow.silent_emplace(|| {}).name("A");
//! let b = flow.silent_emplace(|| {}).name("B");
//! a.precede(b);
//!
//! assert_eq!(
//!     flow.dump(),
//!     "Task \"A\" [dependents:0|successors:1]\n  \
//!      |--> task \"B\"\n\
//!      Task \"B\" [dependents:1|successors:0]"
//! );
//! flow.wait_for_all();
//! ```
//!
//! # Caveats
//!
//! - The graph must be acyclic. No cycle check is performed; a cycle leaves
//!   its tasks waiting on each other forever and `wait_for_all` never
//!   returns.
//! - Graph construction is single-threaded: emplacement, wiring, `dispatch`,
//!   and `dump` belong to the owner thread. `wait_for_all` and
//!   [`TaskOutput::get`] may be called from anywhere.
//! - Once dispatched, a topology runs to completion; there is no
//!   cancellation. A task body that never returns ties up a worker for good.
//!
//! # Optional Tracing Support
//!
//! With the `tracing` cargo feature enabled, the scheduler emits structured
//! events (task addition, dependency wiring, dispatch, per-task execution,
//! completion, shutdown) through the `tracing` crate. When the feature is
//! disabled — the default — the instrumentation is compiled out entirely.
//!
//! ```toml
//! [dependencies]
//! weft = { version = "0.1", features = ["tracing"] }
//! ```

#![allow(private_bounds, private_interfaces)]

// Module declarations
mod builder;
mod error;
mod graph;
mod output;
mod scheduler;
mod task;
mod types;

// Public re-exports
pub use builder::TaskHandle;
pub use error::{TaskError, TaskResult};
pub use output::TaskOutput;
pub use scheduler::Scheduler;
