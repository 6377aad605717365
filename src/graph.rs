//! Graph arena: nodes, edges, and the textual dump.
//!
//! The graph is append-only while the caller is wiring tasks; `dispatch`
//! takes the whole arena by value and hands it to the worker pool. Nodes are
//! addressed by [`NodeId`] (their insertion index), which stays stable
//! because nodes are never removed.

use std::fmt::Write as _;
use std::sync::atomic::AtomicUsize;

use parking_lot::Mutex;

use crate::types::NodeId;

/// A task body: a nullary callable invoked at most once.
pub(crate) type TaskBody = Box<dyn FnOnce() + Send + 'static>;

/// One unit of work plus its scheduling metadata.
pub(crate) struct Node {
    /// Display name used by the dump; empty by default.
    pub(crate) name: String,
    /// Taken exactly once, by the worker that dequeues the node.
    pub(crate) body: Mutex<Option<TaskBody>>,
    /// Incoming edges not yet satisfied. Equals `dependents` at dispatch
    /// time; decremented by workers as predecessors finish.
    pub(crate) pending: AtomicUsize,
    /// Incoming-edge count at construction time, used only for the dump.
    pub(crate) dependents: usize,
    /// Outgoing edges, in insertion order. Duplicates are kept: each entry
    /// bumped the successor's pending count once.
    pub(crate) successors: Vec<NodeId>,
}

/// Append-only arena owning every node added since the last dispatch.
#[derive(Default)]
pub(crate) struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Identifier the next `add_node` call will assign.
    pub(crate) fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    pub(crate) fn add_node(&mut self, body: TaskBody) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node {
            name: String::new(),
            body: Mutex::new(Some(body)),
            pending: AtomicUsize::new(0),
            dependents: 0,
            successors: Vec::new(),
        });
        id
    }

    /// Record the edge `from -> to`: `from` must complete before `to` starts.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.index()].successors.push(to);
        let to = &mut self.nodes[to.index()];
        to.dependents += 1;
        *to.pending.get_mut() += 1;
    }

    pub(crate) fn set_name(&mut self, id: NodeId, name: String) {
        self.nodes[id.index()].name = name;
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Render the graph, one paragraph per node in insertion order.
    ///
    /// Lines are separated by a single newline and the final line carries no
    /// trailing newline.
    pub(crate) fn dump(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(
                out,
                "Task \"{}\" [dependents:{}|successors:{}]",
                node.name,
                node.dependents,
                node.successors.len()
            );
            for &succ in &node.successors {
                let _ = write!(out, "\n  |--> task \"{}\"", self.nodes[succ.index()].name);
            }
        }
        out
    }
}
