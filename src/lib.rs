//! Photon - linkable, versioned value cells
//!
//! A graph of nodes, each holding a current [`Value`] and a stack of prior
//! values. Nodes are linked by Mirror (both ways), Gate (one way) or Pulse
//! (notify only) edges; a commit fans out breadth-first and terminates on
//! cyclic topologies. Nodes compose into clusters and assemblies, and any
//! subtree serializes to a compact PhotonStream.
//!
//! # Quick Start
//!
//! ```ignore
//! use photon::{Graph, Value};
//!
//! let mut graph = Graph::new();
//! let a = graph.create_node_with("Original Value");
//! let b = graph.create_node();
//! graph.connect_mirror(a, b)?;
//!
//! graph.commit(a, "Changed Value")?;
//! assert_eq!(graph.read(b)?, &Value::from("Changed Value"));
//!
//! graph.revert(a)?;
//! assert_eq!(graph.read(a)?, &Value::from("Original Value"));
//!
//! let text = photon::emit(&graph, a)?;
//! let (copy, _cursor) = photon::absorb(&mut graph, &text)?;
//! ```
//!
//! # Architecture
//!
//! - `photon-core`: values, handles, link kinds, errors, limits
//! - `photon-graph`: arena, history, propagation, containers, config
//! - `photon-codec`: PhotonStream capture, encode, decode, materialize

pub use photon_codec::{
    absorb, absorb_all, absorb_at, emit, emit_batch, Photon, PhotonEdge, PhotonGraph,
};
pub use photon_core::{
    ContainerId, EdgeId, Error, GateDirection, LimitError, Limits, LinkKind, Member, NodeId,
    Result, Value, ValueTag,
};
pub use photon_graph::{
    ContainerKind, Edge, Graph, GraphConfig, History, HistoryConfig, HistoryPolicy, MemberIter,
    NodeMut, PropagationConfig, PropagationReport, PulseEvent, RevertPolicy, SubscriptionId,
};
