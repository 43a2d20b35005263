//! Error types for Photon
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two classes share one enum:
//! - Non-fatal conditions (`EmptyHistory`, `DanglingEdge`) that leave state
//!   untouched and may be collected as diagnostics during propagation
//! - Fatal conditions for a single call (`MalformedPhoton`,
//!   `UnknownLinkTarget`, `UnsupportedValueType`, lookups, ownership)

use crate::limits::LimitError;
use crate::types::{ContainerId, EdgeId, Member, NodeId};
use thiserror::Error;

/// Result type alias for Photon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Photon graphs and codecs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// `revert` called on a node with no prior value
    #[error("Empty history: {node} has no prior value to restore")]
    EmptyHistory {
        /// Node that was reverted
        node: NodeId,
    },

    /// Propagation reached an edge whose endpoint no longer exists
    #[error("Dangling edge {edge}: endpoint {target} no longer exists")]
    DanglingEdge {
        /// Offending edge
        edge: EdgeId,
        /// Missing endpoint
        target: NodeId,
    },

    /// Decoder met a token that violates the photon grammar
    #[error("Malformed photon at byte {offset}: {detail}")]
    MalformedPhoton {
        /// Byte offset into the input where parsing failed
        offset: usize,
        /// Human-readable description
        detail: String,
    },

    /// Edge table references a position outside the emitted nodes
    #[error("Unknown link target: position {index} outside {node_count} emitted nodes")]
    UnknownLinkTarget {
        /// Offending position
        index: usize,
        /// Number of nodes in the photon
        node_count: usize,
    },

    /// Emit was asked to serialize a value the grammar cannot express
    #[error("Unsupported value type: {detail}")]
    UnsupportedValueType {
        /// Human-readable description
        detail: String,
    },

    /// Node handle does not refer to a live node
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Container handle does not refer to a live container
    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    /// Edge handle does not refer to a live edge
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Member already belongs to a container (or would create an ownership cycle)
    #[error("Member {member} is already owned by {owner}")]
    AlreadyOwned {
        /// Member being added
        member: Member,
        /// Its current owner (or the container that would become its own ancestor)
        owner: ContainerId,
    },

    /// Assembly already has a field with this name
    #[error("Duplicate field: {field}")]
    DuplicateField {
        /// Field name
        field: String,
    },

    /// Operation requires the other container variant
    #[error("Container {container} is not a {expected}")]
    KindMismatch {
        /// Container handle
        container: ContainerId,
        /// Variant the operation required
        expected: &'static str,
    },

    /// Index outside a cluster's member range
    #[error("Index {index} out of range for container of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Container length
        len: usize,
    },

    /// A size limit was exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// Configuration could not be parsed or holds invalid values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a malformed-photon error at a byte offset
    pub fn malformed(offset: usize, detail: impl Into<String>) -> Self {
        Error::MalformedPhoton {
            offset,
            detail: detail.into(),
        }
    }

    /// Whether the condition leaves state intact and may be reported as a diagnostic
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Error::EmptyHistory { .. } | Error::DanglingEdge { .. })
    }
}
