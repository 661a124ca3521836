//! Error and identifier types for dagnode.
//!
//! Uses thiserror for structured errors. Errors are designed to:
//! - Name the nodes involved so callers can report actionable messages
//! - Be serializable so hosts can forward them across their own boundaries
//! - Never leave edge state half-written when returned

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a node, unique within one connected graph.
///
/// The id is the only equality key used by traversal and cloning. Clones of a
/// node living in a separate graph copy carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    /// Caller-chosen name.
    Name(String),
    /// Caller-chosen integer.
    Index(u64),
    /// Randomly generated id for anonymous nodes.
    Uuid(Uuid),
}

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    /// Create a node ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }

    /// The name, if this id is a [`NodeId::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{}", index),
            Self::Uuid(uuid) => write!(f, "{}", &uuid.to_string()[..8]),
        }
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for NodeId {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }
}

/// Errors related to graph structure and traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphError {
    /// Malformed edge request; no edge state was changed.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the request.
        reason: String,
    },

    /// A walk that assumes acyclicity revisited a node.
    #[error("Cycle detected in graph involving nodes: {nodes:?}")]
    CycleDetected {
        /// Nodes along the offending descent or path, ending at the repeat.
        nodes: Vec<NodeId>,
    },

    /// A node expected in the graph or its clone was missing.
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),
}

impl GraphError {
    /// Shorthand for an [`GraphError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
