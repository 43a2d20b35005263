//! Core types for Photon graphs
//!
//! This module defines the foundational handle and link types:
//! - NodeId / ContainerId / EdgeId: arena handles, assigned once, never reused
//! - Member: an entry of a container (a node or a nested container)
//! - LinkKind: Mirror, Gate (with direction), Pulse

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw arena index
            pub const fn from_index(index: u32) -> Self {
                Self(index)
            }

            /// Raw arena index
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_handle!(
    /// Stable handle of a node inside a graph arena
    NodeId,
    "n"
);

arena_handle!(
    /// Stable handle of a container inside a graph arena
    ContainerId,
    "c"
);

arena_handle!(
    /// Stable handle of a link table edge; ordering follows creation order
    EdgeId,
    "e"
);

/// A member of a container: either a node or a nested container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    /// A value cell
    Node(NodeId),
    /// A nested cluster or assembly
    Container(ContainerId),
}

impl Member {
    /// Node handle if this member is a node
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Member::Node(id) => Some(id),
            Member::Container(_) => None,
        }
    }

    /// Container handle if this member is a container
    pub fn as_container(self) -> Option<ContainerId> {
        match self {
            Member::Container(id) => Some(id),
            Member::Node(_) => None,
        }
    }
}

impl From<NodeId> for Member {
    fn from(id: NodeId) -> Self {
        Member::Node(id)
    }
}

impl From<ContainerId> for Member {
    fn from(id: ContainerId) -> Self {
        Member::Container(id)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Node(id) => id.fmt(f),
            Member::Container(id) => id.fmt(f),
        }
    }
}

/// Declared direction of a Gate edge relative to its stored endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateDirection {
    /// Values flow source → target (`G+`)
    Forward,
    /// Values flow target → source (`G-`)
    Backward,
}

/// Propagation kind carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Copies the value along the edge; paired edges make it bidirectional
    Mirror,
    /// Copies the value only in the declared direction
    Gate(GateDirection),
    /// Notifies the target without touching its value
    Pulse,
}

impl LinkKind {
    /// Whether this edge carries a value write (as opposed to a notification)
    pub fn writes(self) -> bool {
        !matches!(self, LinkKind::Pulse)
    }

    /// Whether values flow from the stored source to the stored target
    pub fn flows_forward(self) -> bool {
        !matches!(self, LinkKind::Gate(GateDirection::Backward))
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Mirror => write!(f, "M"),
            LinkKind::Gate(GateDirection::Forward) => write!(f, "G+"),
            LinkKind::Gate(GateDirection::Backward) => write!(f, "G-"),
            LinkKind::Pulse => write!(f, "P"),
        }
    }
}
