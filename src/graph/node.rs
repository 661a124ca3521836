//! Graph node identity and edge management.
//!
//! A [`GraphNode`] is both a node and a handle to the whole connected graph it
//! belongs to. There is no separate container: every graph-level operation
//! starts from any member node.
//!
//! Edges are always stored as reciprocal pairs. When `a` depends on `b`, `b`
//! appears in `a`'s dependencies and `a` appears in `b`'s dependents, and no
//! public method can create one side without the other.
//!
//! # Acyclicity
//!
//! The graph must be acyclic. Adding an edge does not check for cycles; root
//! discovery and path traversal detect a cycle when they run into one and
//! return [`GraphError::CycleDetected`].

use crate::core::error::{GraphError, GraphResult, NodeId};
use indexmap::IndexSet;
use log::{debug, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Shared storage behind a node handle.
struct NodeCell<T> {
    id: NodeId,
    state: RefCell<NodeState<T>>,
}

struct NodeState<T> {
    payload: T,
    dependencies: Vec<GraphNode<T>>,
    dependents: Vec<GraphNode<T>>,
}

/// A node in a dependency graph.
///
/// `GraphNode` is a cheap, reference-counted handle: `Clone` on the handle
/// yields another handle to the same node. Use
/// [`clone_without_relationships`](GraphNode::clone_without_relationships) or
/// [`clone_with_relationships`](GraphNode::clone_with_relationships) to copy
/// nodes.
///
/// Equality and hashing use the node id only.
///
/// # Memory
///
/// Edges are strong handles in both directions, so a wired graph is never
/// freed by dropping its handles. Call [`dispose`](GraphNode::dispose) on
/// any member once the graph is no longer needed, including on graphs
/// returned by the clone methods.
pub struct GraphNode<T> {
    cell: Rc<NodeCell<T>>,
}

impl<T> Clone for GraphNode<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for GraphNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.cell.state.borrow();
        let ids = |nodes: &[GraphNode<T>]| -> Vec<NodeId> {
            nodes.iter().map(|node| node.id().clone()).collect()
        };
        f.debug_struct("GraphNode")
            .field("id", &self.cell.id)
            .field("dependencies", &ids(&state.dependencies))
            .field("dependents", &ids(&state.dependents))
            .finish()
    }
}

impl<T> PartialEq for GraphNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<T> Eq for GraphNode<T> {}

impl<T> Hash for GraphNode<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<T> GraphNode<T> {
    /// Create a node with no edges.
    pub fn new(id: impl Into<NodeId>, payload: T) -> Self {
        Self {
            cell: Rc::new(NodeCell {
                id: id.into(),
                state: RefCell::new(NodeState {
                    payload,
                    dependencies: Vec::new(),
                    dependents: Vec::new(),
                }),
            }),
        }
    }

    /// Create a node with a default payload.
    pub fn bare(id: impl Into<NodeId>) -> Self
    where
        T: Default,
    {
        Self::new(id, T::default())
    }

    /// The node's identifier.
    pub fn id(&self) -> &NodeId {
        &self.cell.id
    }

    /// Borrow the payload.
    ///
    /// Panics if the payload is currently borrowed mutably.
    pub fn payload(&self) -> Ref<'_, T> {
        Ref::map(self.cell.state.borrow(), |state| &state.payload)
    }

    /// Borrow the payload mutably.
    ///
    /// Panics if the node's state is currently borrowed.
    pub fn payload_mut(&self) -> RefMut<'_, T> {
        RefMut::map(self.cell.state.borrow_mut(), |state| &mut state.payload)
    }

    /// Replace the payload, returning the previous one.
    pub fn set_payload(&self, payload: T) -> T {
        std::mem::replace(&mut *self.payload_mut(), payload)
    }

    /// Whether both handles refer to the same in-memory node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Snapshot of the nodes this node depends on, in insertion order.
    pub fn dependencies(&self) -> Vec<GraphNode<T>> {
        self.cell.state.borrow().dependencies.clone()
    }

    /// Snapshot of the nodes that depend on this node, in insertion order.
    pub fn dependents(&self) -> Vec<GraphNode<T>> {
        self.cell.state.borrow().dependents.clone()
    }

    /// Number of direct dependencies.
    pub fn dependency_count(&self) -> usize {
        self.cell.state.borrow().dependencies.len()
    }

    /// Number of direct dependents.
    pub fn dependent_count(&self) -> usize {
        self.cell.state.borrow().dependents.len()
    }

    /// Whether a node with `id` is a direct dependency.
    pub fn has_dependency(&self, id: &NodeId) -> bool {
        self.cell
            .state
            .borrow()
            .dependencies
            .iter()
            .any(|node| node.id() == id)
    }

    /// Whether a node with `id` is a direct dependent.
    pub fn has_dependent(&self, id: &NodeId) -> bool {
        self.cell
            .state
            .borrow()
            .dependents
            .iter()
            .any(|node| node.id() == id)
    }

    /// True when the node has no dependencies.
    pub fn is_root(&self) -> bool {
        self.dependency_count() == 0
    }

    /// True when nothing depends on the node.
    pub fn is_leaf(&self) -> bool {
        self.dependent_count() == 0
    }

    /// Record that this node depends on `other`.
    ///
    /// Adding a dependency that is already present (by id) is a no-op.
    /// Fails with [`GraphError::InvalidArgument`] for a self-dependency or
    /// when `other` is a different node carrying this node's id; edge state is
    /// left untouched in both cases.
    pub fn add_dependency(&self, other: &GraphNode<T>) -> GraphResult<()> {
        if self.ptr_eq(other) {
            return Err(GraphError::invalid_argument(format!(
                "node {} cannot depend on itself",
                self.id()
            )));
        }
        if self.id() == other.id() {
            return Err(GraphError::invalid_argument(format!(
                "distinct nodes share id {}",
                self.id()
            )));
        }
        if self.has_dependency(other.id()) {
            return Ok(());
        }

        other.cell.state.borrow_mut().dependents.push(self.clone());
        self.cell.state.borrow_mut().dependencies.push(other.clone());
        debug!("{} now depends on {}", self.id(), other.id());
        Ok(())
    }

    /// Record that `other` depends on this node.
    pub fn add_dependent(&self, other: &GraphNode<T>) -> GraphResult<()> {
        other.add_dependency(self)
    }

    /// Find the canonical root of this node's graph.
    ///
    /// Follows the first dependency until reaching a node with none. When
    /// several dependency-free nodes exist the first-edge policy picks one
    /// deterministically.
    ///
    /// Returns [`GraphError::CycleDetected`] if the descent revisits a node.
    pub fn root_node(&self) -> GraphResult<GraphNode<T>> {
        let mut descent = IndexSet::new();
        descent.insert(self.id().clone());
        let mut current = self.clone();

        loop {
            let next = current.cell.state.borrow().dependencies.first().cloned();
            let Some(next) = next else {
                return Ok(current);
            };
            if !descent.insert(next.id().clone()) {
                warn!("cycle while searching root from {}", self.id());
                return Err(GraphError::CycleDetected {
                    nodes: descent.into_iter().collect(),
                });
            }
            current = next;
        }
    }

    /// Sever every edge in this node's connected graph.
    ///
    /// Nodes hold each other through reference-counted handles in both
    /// directions, so a wired graph keeps itself alive. Call this when the
    /// graph is no longer needed. Returns the number of nodes detached.
    pub fn dispose(&self) -> usize {
        let mut component = Vec::new();
        self.traverse_with(
            |node, _| component.push(node.clone()),
            |node| {
                let mut neighbors = node.dependencies();
                neighbors.extend(node.dependents());
                neighbors
            },
        );

        for node in &component {
            let mut state = node.cell.state.borrow_mut();
            state.dependencies.clear();
            state.dependents.clear();
        }
        debug!("disposed graph of {} nodes from {}", component.len(), self.id());
        component.len()
    }
}
