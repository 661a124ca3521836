//! Breadth-first traversal over dependency graphs.
//!
//! Two primitives are provided:
//! - Path traversal: visits a node once per distinct path from the origin and
//!   hands the iterator the full path. Used to reason about every route
//!   between two nodes.
//! - Visited-once traversal: each reachable node is reported exactly once, in
//!   breadth-first discovery order.
//!
//! Both are driven by a neighbor function deciding which nodes to schedule
//! after each visit. Paths are passed as slices with the current node first
//! and the origin last.
//!
//! The graph must be acyclic. Path traversal checks for cycles by default;
//! visited-once traversal terminates on any graph.

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::graph::node::GraphNode;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::convert::Infallible;

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward nodes that depend on the current node.
    #[default]
    Dependents,
    /// Toward the current node's prerequisites.
    Dependencies,
}

impl Direction {
    /// Neighbors of `node` in this direction.
    pub fn neighbors<T>(self, node: &GraphNode<T>) -> Vec<GraphNode<T>> {
        match self {
            Self::Dependents => node.dependents(),
            Self::Dependencies => node.dependencies(),
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Dependents => Self::Dependencies,
            Self::Dependencies => Self::Dependents,
        }
    }
}

/// Traversal options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalOptions {
    /// Edges followed when no custom neighbor function is given.
    pub direction: Direction,
    /// Maximum number of edges between the origin and a visited node.
    /// Nodes further away are not scheduled. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Whether path traversal fails when a path would revisit one of its
    /// own nodes.
    pub detect_cycles: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Dependents,
            max_depth: None,
            detect_cycles: true,
        }
    }
}

impl TraversalOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Limit the traversal depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Enable/disable cycle detection in path traversal.
    pub fn with_cycle_detection(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    fn schedules_beyond(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |limit| depth < limit)
    }
}

impl<T> GraphNode<T> {
    /// Core breadth-first walk over paths.
    ///
    /// `get_next` receives the current node and its path and returns the
    /// nodes to schedule, or an error that aborts the walk.
    fn walk_paths<E, I, N>(
        &self,
        options: &TraversalOptions,
        mut iterator: I,
        mut get_next: N,
    ) -> Result<(), E>
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
        N: FnMut(&GraphNode<T>, &[GraphNode<T>]) -> Result<Vec<GraphNode<T>>, E>,
    {
        let mut queue: VecDeque<Vec<GraphNode<T>>> = VecDeque::new();
        queue.push_back(vec![self.clone()]);

        while let Some(path) = queue.pop_front() {
            let Some(node) = path.first() else {
                continue;
            };
            let depth = path.len() - 1;
            trace!("visit {} (depth {})", node.id(), depth);
            iterator(node, &path);

            if !options.schedules_beyond(depth) {
                continue;
            }
            for next in get_next(node, &path)? {
                let mut next_path = Vec::with_capacity(path.len() + 1);
                next_path.push(next);
                next_path.extend(path.iter().cloned());
                queue.push_back(next_path);
            }
        }

        Ok(())
    }

    /// Visit this node and everything reachable through `get_next`, once per
    /// distinct path.
    ///
    /// The iterator receives each node together with its path (current node
    /// first, this node last). A node reachable along two routes is reported
    /// twice. The graph must be acyclic: a path that would revisit one of its
    /// own nodes fails with [`GraphError::CycleDetected`].
    pub fn traverse_paths<I, N>(&self, iterator: I, get_next: N) -> GraphResult<()>
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
        N: FnMut(&GraphNode<T>) -> Vec<GraphNode<T>>,
    {
        self.traverse_paths_with_options(&TraversalOptions::default(), iterator, get_next)
    }

    /// [`traverse_paths`](GraphNode::traverse_paths) honoring `options`.
    ///
    /// `options.direction` is unused since `get_next` picks the neighbors.
    pub fn traverse_paths_with_options<I, N>(
        &self,
        options: &TraversalOptions,
        iterator: I,
        mut get_next: N,
    ) -> GraphResult<()>
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
        N: FnMut(&GraphNode<T>) -> Vec<GraphNode<T>>,
    {
        let detect_cycles = options.detect_cycles;
        self.walk_paths(options, iterator, |node, path| {
            let next = get_next(node);
            if detect_cycles {
                if let Some(repeat) = next
                    .iter()
                    .find(|candidate| path.iter().any(|seen| seen.id() == candidate.id()))
                {
                    warn!("cycle through {} while traversing from {}", repeat.id(), self.id());
                    let mut nodes: Vec<NodeId> =
                        path.iter().rev().map(|seen| seen.id().clone()).collect();
                    nodes.push(repeat.id().clone());
                    return Err(GraphError::CycleDetected { nodes });
                }
            }
            Ok(next)
        })
    }

    /// Visit this node and every node reachable through its dependents,
    /// each exactly once, in breadth-first order.
    pub fn traverse<I>(&self, iterator: I)
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
    {
        self.traverse_with(iterator, GraphNode::dependents);
    }

    /// Visit this node and every node reachable through `get_next`, each
    /// exactly once, in breadth-first order.
    ///
    /// Nodes are marked visited when scheduled, so a node reachable along
    /// several edges is queued only once. The reported path is the one
    /// through which the node was first discovered.
    pub fn traverse_with<I, N>(&self, iterator: I, get_next: N)
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
        N: FnMut(&GraphNode<T>) -> Vec<GraphNode<T>>,
    {
        let options = TraversalOptions::default().with_cycle_detection(false);
        self.visit_once(&options, iterator, get_next);
    }

    /// Visited-once traversal following `options.direction` and stopping at
    /// `options.max_depth`.
    pub fn traverse_with_options<I>(&self, options: &TraversalOptions, iterator: I)
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
    {
        let direction = options.direction;
        self.visit_once(options, iterator, |node| direction.neighbors(node));
    }

    /// Ids of every node reachable in `direction`, in breadth-first order,
    /// starting with this node.
    pub fn collect_ids(&self, direction: Direction) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.traverse_with(|node, _| ids.push(node.id().clone()), |node| direction.neighbors(node));
        ids
    }

    fn visit_once<I, N>(&self, options: &TraversalOptions, iterator: I, mut get_next: N)
    where
        I: FnMut(&GraphNode<T>, &[GraphNode<T>]),
        N: FnMut(&GraphNode<T>) -> Vec<GraphNode<T>>,
    {
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(self.id().clone());

        let walked = self.walk_paths::<Infallible, _, _>(options, iterator, |node, _| {
            Ok(get_next(node)
                .into_iter()
                .filter(|next| visited.insert(next.id().clone()))
                .collect())
        });
        if let Err(never) = walked {
            match never {}
        }
    }
}
