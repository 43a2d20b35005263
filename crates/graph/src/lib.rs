//! Node graph for Photon
//!
//! This crate owns the in-memory model:
//! - Graph: arena of nodes, containers and links
//! - History: bounded per-node stack of prior values
//! - Link table: Mirror, Gate and Pulse edges in creation order
//! - Propagation: breadth-first, cycle-safe fan-out of commits
//! - Containers: clusters and assemblies forming an ownership tree
//! - NodeMut: fluent handle for chaining commits and link creation
//! - GraphConfig: TOML-backed history/propagation/limits settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod graph;
pub mod handle;
pub mod link;
pub mod node;
pub mod propagation;

pub use config::{GraphConfig, HistoryConfig, HistoryPolicy, PropagationConfig, RevertPolicy};
pub use container::{ContainerKind, MemberIter};
pub use graph::{Graph, SubscriptionId};
pub use handle::NodeMut;
pub use link::Edge;
pub use node::History;
pub use propagation::{PropagationReport, PulseEvent};
