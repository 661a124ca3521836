//! # dagnode - Dependency graph nodes
//!
//! dagnode models dependency relationships between arbitrary work items such
//! as build steps, network requests or computation tasks. Each node records
//! the nodes it depends on and the nodes depending on it; any node is a handle
//! to the whole connected graph.
//!
//! ## Features
//!
//! - **Reciprocal edges**: dependencies and dependents are kept in sync
//! - **Path traversal**: breadth-first walk reporting every distinct path
//! - **Visited-once traversal**: breadth-first walk reporting each node once
//! - **Root discovery**: canonical root by following first dependencies
//! - **Filtered cloning**: copy the graph keeping matches and the paths to them
//!
//! ## Quick Start
//!
//! ```rust
//! use dagnode::prelude::*;
//!
//! // Payload: estimated cost in seconds
//! let fetch: GraphNode<u32> = GraphNode::new("fetch", 5);
//! let build = GraphNode::new("build", 60);
//! let test = GraphNode::new("test", 30);
//!
//! build.add_dependency(&fetch).unwrap();
//! test.add_dependency(&build).unwrap();
//!
//! assert!(test.root_node().unwrap().ptr_eq(&fetch));
//!
//! let mut order = Vec::new();
//! fetch.traverse(|node, _| order.push(node.id().to_string()));
//! assert_eq!(order, vec!["fetch", "build", "test"]);
//!
//! // Keep only what `build` needs
//! let copy = fetch
//!     .clone_with_relationships(Some(|node: &GraphNode<u32>| node.id() == &NodeId::from("build")))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(copy.dependent_count(), 1);
//! assert!(copy.dependents()[0].is_leaf());
//!
//! fetch.dispose();
//! ```
//!
//! ## Ownership
//!
//! Nodes reference each other in both directions through reference-counted
//! handles, so a wired graph stays alive as long as any of its nodes is held
//! and is not freed on its own. Call [`GraphNode::dispose`] on any member to
//! sever the edges once the graph is no longer needed.
//!
//! ## Acyclicity
//!
//! Graphs must be acyclic. Edge insertion does not check this. Root discovery
//! and path traversal report [`GraphError::CycleDetected`] when they run into
//! a cycle.
//!
//! ## Architecture
//!
//! - [`core`]: Node identifiers and error handling
//! - [`graph`]: Nodes, traversal and cloning

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod graph;

pub use crate::core::error::{GraphError, GraphResult, NodeId};
pub use crate::graph::{Direction, GraphNode, TraversalOptions};

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use dagnode::prelude::*;
/// ```
pub mod prelude {
    // Errors and ids
    pub use crate::core::error::{GraphError, GraphResult, NodeId};

    // Graph
    pub use crate::graph::node::GraphNode;
    pub use crate::graph::traversal::{Direction, TraversalOptions};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
