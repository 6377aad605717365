//! Builder handles for wiring dependencies between emplaced tasks.

use crate::scheduler::Scheduler;
use crate::types::NodeId;

/// A lightweight, copyable reference to a task in a scheduler's current
/// graph.
///
/// Handles are returned by [`Scheduler::emplace`] and
/// [`Scheduler::silent_emplace`] and stay valid until the graph they point
/// into is dispatched. Every wiring operation returns the handle again, so
/// calls chain:
///
/// ```
/// use weft::Scheduler;
///
/// let flow = Scheduler::new(2);
/// let a = flow.silent_emplace(|| println!("A")).name("A");
/// let b = flow.silent_emplace(|| println!("B")).name("B");
/// let c = flow.silent_emplace(|| println!("C")).name("C");
/// a.broadcast([b, c]);
/// flow.wait_for_all();
/// ```
///
/// # Panics
///
/// All wiring operations panic if the handle (or a handle passed to them)
/// outlived its dispatch cycle, or if the two handles belong to different
/// schedulers.
#[derive(Clone, Copy)]
pub struct TaskHandle<'f> {
    pub(crate) flow: &'f Scheduler,
    pub(crate) id: NodeId,
    pub(crate) cycle: u64,
}

impl<'f> TaskHandle<'f> {
    /// Add the edge `self -> succ`: this task must complete before `succ`
    /// starts.
    pub fn precede(self, succ: TaskHandle<'_>) -> Self {
        self.flow.wire(self, succ);
        self
    }

    /// Add an edge from this task to each handle in `succs`; equivalent to
    /// one [`TaskHandle::precede`] call per element. An empty collection is
    /// a no-op.
    pub fn broadcast<'b>(self, succs: impl IntoIterator<Item = TaskHandle<'b>>) -> Self {
        for succ in succs {
            self.flow.wire(self, succ);
        }
        self
    }

    /// Add an edge from each handle in `deps` to this task; the mirror image
    /// of [`TaskHandle::broadcast`]. An empty collection is a no-op.
    pub fn gather<'b>(self, deps: impl IntoIterator<Item = TaskHandle<'b>>) -> Self {
        for dep in deps {
            self.flow.wire(dep, self);
        }
        self
    }

    /// Set the display name shown by [`Scheduler::dump`].
    pub fn name(self, name: impl Into<String>) -> Self {
        self.flow.rename(self, name.into());
        self
    }
}
