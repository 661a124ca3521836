//! Structural cloning of dependency graphs.
//!
//! A filtered clone keeps the nodes matched by a predicate plus everything a
//! match transitively depends on, so all routes between retained nodes
//! survive and every retained node keeps its full set of dependencies.

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::graph::node::GraphNode;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::cell::RefCell;

impl<T: Clone> GraphNode<T> {
    /// Copy the id and payload into a new node with no edges.
    pub fn clone_without_relationships(&self) -> Self {
        GraphNode::new(self.id().clone(), self.payload().clone())
    }

    /// Clone the graph containing this node, keeping only the nodes that
    /// match `predicate` and the nodes on dependency paths leading to them.
    ///
    /// Matches are looked for among the nodes reachable from the root; each
    /// match brings along all of its dependencies, transitively. Without a
    /// predicate every node of the connected graph is kept. Retained nodes
    /// keep all of their dependencies in the original order.
    ///
    /// Returns the clone of this node, or `None` when this node does not
    /// survive the filtering. The clone shares no state with the original.
    ///
    /// The graph must be acyclic; root discovery fails with
    /// [`GraphError::CycleDetected`] otherwise.
    pub fn clone_with_relationships<P>(&self, predicate: Option<P>) -> GraphResult<Option<Self>>
    where
        P: FnMut(&GraphNode<T>) -> bool,
    {
        let root = self.root_node()?;
        let retained = predicate.map(|predicate| root.ids_to_retain(predicate));
        let keep = |node: &GraphNode<T>| {
            retained
                .as_ref()
                .map_or(true, |retained| retained.contains(node.id()))
        };

        // original id -> (original, clone)
        let mut copies: IndexMap<NodeId, (GraphNode<T>, GraphNode<T>)> = IndexMap::new();
        for original in root.clone_order() {
            if keep(&original) {
                let copy = original.clone_without_relationships();
                copies.insert(original.id().clone(), (original, copy));
            }
        }

        // Wiring after every copy exists keeps dependency order intact even
        // when breadth-first order reaches a dependent before its dependency.
        for (original, copy) in copies.values() {
            for dependency in original.dependencies() {
                let (_, copied_dependency) = copies
                    .get(dependency.id())
                    .ok_or_else(|| GraphError::NodeNotFound(dependency.id().clone()))?;
                copy.add_dependency(copied_dependency)?;
            }
        }

        debug!(
            "cloned {} nodes from root {} for {}",
            copies.len(),
            root.id(),
            self.id()
        );
        Ok(copies.swap_remove(self.id()).map(|(_, copy)| copy))
    }

    /// Clone the whole graph containing this node.
    pub fn clone_graph(&self) -> GraphResult<Self> {
        self.clone_with_relationships(None::<fn(&GraphNode<T>) -> bool>)?
            .ok_or_else(|| GraphError::NodeNotFound(self.id().clone()))
    }
}

impl<T> GraphNode<T> {
    /// Every node of this node's connected graph: first those reached
    /// breadth-first through dependents from this node, then the rest.
    fn clone_order(&self) -> Vec<GraphNode<T>> {
        let mut order: IndexMap<NodeId, GraphNode<T>> = IndexMap::new();
        self.traverse(|node, _| {
            order.insert(node.id().clone(), node.clone());
        });
        self.traverse_with(
            |node, _| {
                order
                    .entry(node.id().clone())
                    .or_insert_with(|| node.clone());
            },
            |node| {
                let mut neighbors = node.dependents();
                neighbors.extend(node.dependencies());
                neighbors
            },
        );
        order.into_values().collect()
    }

    /// Ids of the nodes reachable from this root that match `predicate`,
    /// together with all of their transitive dependencies.
    fn ids_to_retain<P>(&self, mut predicate: P) -> IndexSet<NodeId>
    where
        P: FnMut(&GraphNode<T>) -> bool,
    {
        let retained = RefCell::new(IndexSet::new());
        self.traverse(|node, _| {
            if !predicate(node) {
                return;
            }
            node.traverse_with(
                |ancestor, _| {
                    retained.borrow_mut().insert(ancestor.id().clone());
                },
                |ancestor| {
                    let retained = retained.borrow();
                    ancestor
                        .dependencies()
                        .into_iter()
                        .filter(|dependency| !retained.contains(dependency.id()))
                        .collect()
                },
            );
        });
        retained.into_inner()
    }
}
