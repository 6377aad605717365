//! Scheduler: the user-facing façade owning the worker pool, the current
//! graph, the shared ready-queue, and the completion latch.
//!
//! Workers sleep on a single condition variable and wake when a dispatch (or
//! a finishing predecessor) pushes ready nodes onto the queue. Completion of
//! a dispatched topology is tracked with an outstanding-node counter; the
//! last finishing node fires the topology's result channel and, once no
//! topology remains in flight, wakes threads blocked in
//! [`Scheduler::wait_for_all`].

use std::collections::VecDeque;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::builder::TaskHandle;
use crate::graph::{Graph, Node, TaskBody};
use crate::output::{self, Promise, TaskOutput};
use crate::task::Emplace;
use crate::types::NodeId;

/// Build and execute task graphs on a fixed pool of worker threads.
///
/// # Workflow
///
/// 1. Create a scheduler with [`Scheduler::new`], choosing the worker count
/// 2. Add tasks with [`Scheduler::emplace`] or [`Scheduler::silent_emplace`]
/// 3. Wire dependencies through the returned [`TaskHandle`]s
/// 4. Run everything with [`Scheduler::wait_for_all`] (or an explicit
///    [`Scheduler::dispatch`])
/// 5. Observe per-task values through their [`TaskOutput`] channels
///
/// A scheduler is reusable: after `wait_for_all` returns, a fresh graph can
/// be built and dispatched on the same pool. Dropping the scheduler waits
/// for all in-flight work, then shuts the pool down.
///
/// # Examples
///
/// ```
/// use weft::Scheduler;
///
/// let flow = Scheduler::new(4);
///
/// let (a, sum) = flow.emplace(|| 2 + 3);
/// let b = flow.silent_emplace(|| println!("after the sum"));
/// a.precede(b);
///
/// flow.wait_for_all();
/// assert_eq!(sum.get(), 5);
/// ```
///
/// # Caveats
///
/// The graph must be acyclic; no cycle check is performed, and a cycle
/// leaves its tasks permanently pending, blocking `wait_for_all` forever.
/// Graph construction (emplacement, wiring, `dispatch`, `dump`) belongs to
/// one owner thread; `wait_for_all` and [`TaskOutput::get`] may be called
/// from any thread.
pub struct Scheduler {
    inner: Arc<Inner>,
    state: Mutex<BuildState>,
    workers: Vec<JoinHandle<()>>,
}

/// The graph being built, plus the dispatch generation used to invalidate
/// handles once their graph has been captured.
#[derive(Default)]
struct BuildState {
    graph: Graph,
    cycle: u64,
}

/// State shared between the owner thread and the worker pool.
struct Inner {
    /// FIFO of nodes whose pending count reached zero.
    queue: Mutex<VecDeque<ReadyTask>>,
    /// Signalled when the queue gains entries or shutdown begins.
    work_available: Condvar,
    shutdown: AtomicBool,
    /// Dispatched topologies not yet fully drained.
    in_flight: Mutex<usize>,
    /// Signalled when `in_flight` drops to zero.
    all_done: Condvar,
}

/// A queue entry: one runnable node of an in-flight topology.
struct ReadyTask {
    topology: Arc<Topology>,
    index: NodeId,
}

/// Snapshot of a graph committed by one dispatch call.
struct Topology {
    nodes: Vec<Node>,
    /// Nodes not yet finished; the decrement to zero fires `done`.
    outstanding: AtomicUsize,
    done: Promise<()>,
}

impl Scheduler {
    /// Create a scheduler with `num_workers` worker threads.
    ///
    /// `num_workers == 0` is legal: no threads are spawned and the calling
    /// thread executes all tasks itself inside [`Scheduler::wait_for_all`].
    /// This is the recommended mode for debugging task bodies.
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to spawn a worker thread.
    pub fn new(num_workers: usize) -> Self {
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            work_available: Condvar::new(),
            shutdown: AtomicBool::new(false),
            in_flight: Mutex::new(0),
            all_done: Condvar::new(),
        });

        let workers = (0..num_workers)
            .map(|i| {
                let inner = Arc::clone(&inner);
                thread::Builder::new()
                    .name(format!("weft-worker-{i}"))
                    .spawn(move || inner.worker_loop())
                    .expect("failed to spawn worker thread")
            })
            .collect();

        #[cfg(feature = "tracing")]
        debug!(num_workers, "scheduler created");

        Self {
            inner,
            state: Mutex::new(BuildState::default()),
            workers,
        }
    }

    /// Number of worker threads in the pool.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Add one or more value-returning tasks to the current graph.
    ///
    /// Accepts a single closure or a tuple of closures (arity up to 8) and
    /// returns, positionally, a `(TaskHandle, TaskOutput)` pair per closure.
    /// The channel is filled when the task runs: with the closure's return
    /// value, or with the captured panic if the body panicked.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft::Scheduler;
    ///
    /// let flow = Scheduler::new(1);
    /// let ((_a, x), (_b, y)) = flow.emplace((|| 6 * 7, || "hi"));
    /// flow.wait_for_all();
    /// assert_eq!(x.get(), 42);
    /// assert_eq!(y.get(), "hi");
    /// ```
    #[allow(private_bounds)]
    pub fn emplace<M, E>(&self, tasks: E) -> E::Outputs<'_>
    where
        E: Emplace<M>,
    {
        tasks.emplace_into(self)
    }

    /// Like [`Scheduler::emplace`], but without result channels: returns
    /// only the handles, and the tasks' return values (and panics) are
    /// discarded.
    #[allow(private_bounds)]
    pub fn silent_emplace<M, E>(&self, tasks: E) -> E::Handles<'_>
    where
        E: Emplace<M>,
    {
        tasks.silent_emplace_into(self)
    }

    /// Capture the current graph as a topology and hand it to the worker
    /// pool, then return a channel completed when every captured node has
    /// finished.
    ///
    /// Subsequent emplacements accumulate into a fresh graph for the next
    /// dispatch; handles into the captured graph become invalid. Multiple
    /// topologies may be in flight at once.
    pub fn dispatch(&self) -> TaskOutput<()> {
        self.launch()
    }

    /// [`Scheduler::dispatch`] without the completion channel.
    pub fn silent_dispatch(&self) {
        let _ = self.launch();
    }

    /// Block until every dispatched topology has completed and the current
    /// graph is empty. A non-empty current graph is dispatched first.
    ///
    /// With a zero-worker pool, the calling thread drains the ready-queue
    /// itself before waiting.
    pub fn wait_for_all(&self) {
        if !self.state.lock().graph.is_empty() {
            self.silent_dispatch();
        }

        if self.workers.is_empty() {
            loop {
                let ready = self.inner.queue.lock().pop_front();
                match ready {
                    Some(ready) => self.inner.execute(ready),
                    None => break,
                }
            }
        }

        let mut in_flight = self.inner.in_flight.lock();
        while *in_flight != 0 {
            self.inner.all_done.wait(&mut in_flight);
        }
    }

    /// Render the current (undispatched) graph as text.
    ///
    /// One paragraph per node in insertion order, each listing the node's
    /// name, dependent count, successor count, and one `|--> task "NAME"`
    /// line per successor.
    pub fn dump(&self) -> String {
        self.state.lock().graph.dump()
    }

    pub(crate) fn push_silent(&self, body: TaskBody) -> TaskHandle<'_> {
        let mut state = self.state.lock();
        let id = state.graph.add_node(body);

        #[cfg(feature = "tracing")]
        debug!(task_id = id.index(), "adding task to graph");

        TaskHandle {
            flow: self,
            id,
            cycle: state.cycle,
        }
    }

    pub(crate) fn push<F, R>(&self, f: F) -> (TaskHandle<'_>, TaskOutput<R>)
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut state = self.state.lock();
        let id = state.graph.next_id();
        let (promise, channel) = output::channel(id.index());
        state.graph.add_node(Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(f));
            promise.complete(result);
        }));

        #[cfg(feature = "tracing")]
        debug!(task_id = id.index(), "adding task to graph");

        let handle = TaskHandle {
            flow: self,
            id,
            cycle: state.cycle,
        };
        (handle, channel)
    }

    pub(crate) fn wire(&self, from: TaskHandle<'_>, to: TaskHandle<'_>) {
        assert!(
            ptr::eq(from.flow, self) && ptr::eq(to.flow, self),
            "task handles belong to different schedulers"
        );
        let mut state = self.state.lock();
        assert!(
            from.cycle == state.cycle && to.cycle == state.cycle,
            "task handle used after dispatch"
        );

        #[cfg(feature = "tracing")]
        debug!(
            from = from.id.index(),
            to = to.id.index(),
            "wiring dependency"
        );

        state.graph.add_edge(from.id, to.id);
    }

    pub(crate) fn rename(&self, handle: TaskHandle<'_>, name: String) {
        assert!(
            ptr::eq(handle.flow, self),
            "task handle belongs to a different scheduler"
        );
        let mut state = self.state.lock();
        assert!(
            handle.cycle == state.cycle,
            "task handle used after dispatch"
        );
        state.graph.set_name(handle.id, name);
    }

    fn launch(&self) -> TaskOutput<()> {
        let (graph, cycle) = {
            let mut state = self.state.lock();
            if state.graph.is_empty() {
                // Nothing to capture; hand back an already-fired channel.
                let (promise, channel) = output::channel(state.cycle as usize);
                promise.complete(Ok(()));
                return channel;
            }
            let cycle = state.cycle;
            state.cycle += 1;
            (mem::take(&mut state.graph), cycle)
        };

        let task_count = graph.len();
        let (done, channel) = output::channel(cycle as usize);
        let topology = Arc::new(Topology {
            outstanding: AtomicUsize::new(task_count),
            nodes: graph.into_nodes(),
            done,
        });

        #[cfg(feature = "tracing")]
        debug!(task_count, cycle, "dispatching topology");

        *self.inner.in_flight.lock() += 1;

        {
            let mut queue = self.inner.queue.lock();
            for (index, node) in topology.nodes.iter().enumerate() {
                if node.pending.load(Ordering::Relaxed) == 0 {
                    queue.push_back(ReadyTask {
                        topology: Arc::clone(&topology),
                        index: NodeId(index),
                    });
                }
            }
        }
        self.inner.work_available.notify_all();

        channel
    }
}

impl Drop for Scheduler {
    /// Implicitly waits for all dispatched topologies, then joins the pool.
    fn drop(&mut self) {
        self.wait_for_all();

        #[cfg(feature = "tracing")]
        debug!("shutting down worker pool");

        self.inner.shutdown.store(true, Ordering::Release);
        self.inner.work_available.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Inner {
    fn worker_loop(&self) {
        loop {
            let ready = {
                let mut queue = self.queue.lock();
                loop {
                    if let Some(ready) = queue.pop_front() {
                        break ready;
                    }
                    if self.shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    self.work_available.wait(&mut queue);
                }
            };
            self.execute(ready);
        }
    }

    /// Run one node, then propagate readiness downstream and account for
    /// topology completion.
    fn execute(&self, ready: ReadyTask) {
        let ReadyTask { topology, index } = ready;
        let node = &topology.nodes[index.index()];

        #[cfg(feature = "tracing")]
        trace!(task_id = index.index(), name = %node.name, "executing task");

        let body = node.body.lock().take();
        if let Some(body) = body {
            // Emplaced bodies publish panics into their channel; a panic
            // reaching this frame came from a silent task and is discarded.
            let _ = panic::catch_unwind(AssertUnwindSafe(|| body()));
        }

        for &succ in &node.successors {
            // The release half of this decrement publishes our node's
            // effects; the acquire half on the final decrement lets the
            // enqueueing worker observe every predecessor's effects.
            if topology.nodes[succ.index()].pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                let mut queue = self.queue.lock();
                queue.push_back(ReadyTask {
                    topology: Arc::clone(&topology),
                    index: succ,
                });
                self.work_available.notify_one();
            }
        }

        if topology.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            #[cfg(feature = "tracing")]
            trace!("topology complete");

            topology.done.complete(Ok(()));
            let mut in_flight = self.in_flight.lock();
            *in_flight -= 1;
            if *in_flight == 0 {
                self.all_done.notify_all();
            }
        }
    }
}
