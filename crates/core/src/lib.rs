//! Core types for Photon
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: closed tagged union held by every node
//! - NodeId / ContainerId / EdgeId / Member: arena handles
//! - LinkKind / GateDirection: propagation kinds carried by edges
//! - Error: Error type hierarchy
//! - Limits: codec size limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use limits::{LimitError, Limits};
pub use types::{ContainerId, EdgeId, GateDirection, LinkKind, Member, NodeId};
pub use value::{Value, ValueTag};
