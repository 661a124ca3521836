//! Core types shared by the graph module.
//!
//! - Node identifiers
//! - Error types

pub mod error;

// Re-export commonly used types
pub use error::{GraphError, GraphResult, NodeId};
