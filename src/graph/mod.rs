//! Graph module for dependency nodes.
//!
//! A dependency graph is a directed acyclic graph (DAG) where each node knows
//! both the nodes it depends on and the nodes depending on it. Any node is an
//! entry point to the whole connected graph.

pub mod node;
pub mod traversal;
pub mod clone;

// Re-export commonly used types
pub use node::GraphNode;
pub use traversal::{Direction, TraversalOptions};
