//! The graph arena
//!
//! `Graph` owns every node, container and edge. Handles are plain indices
//! into its arenas; freed slots stay empty so a handle is never reused.
//! Edges are weak relations: destroying a node always prunes its edges first.
//!
//! All mutation is synchronous and single-threaded. Callers sharing a graph
//! across threads must serialize access themselves (one lock per graph).

use crate::config::{GraphConfig, RevertPolicy};
use crate::container::ContainerSlot;
use crate::link::{Edge, LinkTable};
use crate::node::{History, NodeSlot};
use crate::propagation::{PropagationReport, PulseEvent, Wave};
use photon_core::{
    ContainerId, EdgeId, Error, GateDirection, LinkKind, Member, NodeId, Result, Value,
};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

/// Handle returned by [`Graph::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Listener = Box<dyn FnMut(&PulseEvent)>;

/// Arena of nodes, containers and links
pub struct Graph {
    pub(crate) config: GraphConfig,
    pub(crate) nodes: Vec<Option<NodeSlot>>,
    pub(crate) containers: Vec<Option<ContainerSlot>>,
    pub(crate) links: LinkTable,
    pub(crate) listeners: FxHashMap<NodeId, Vec<(SubscriptionId, Listener)>>,
    next_subscription: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("containers", &self.container_count())
            .field("edges", &self.links.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Graph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty graph with an explicit configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            containers: Vec::new(),
            links: LinkTable::default(),
            listeners: FxHashMap::default(),
            next_subscription: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of live containers
    pub fn container_count(&self) -> usize {
        self.containers.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of live edges
    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    // ========== Nodes ==========

    /// Create a node holding `Null`
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(Value::Null)
    }

    /// Create a node holding `value`. No history, no propagation.
    pub fn create_node_with(&mut self, value: impl Into<Value>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Some(NodeSlot::new(value.into())));
        id
    }

    /// Whether `id` refers to a live node
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.slot(id).is_ok()
    }

    pub(crate) fn slot(&self, id: NodeId) -> Result<&NodeSlot> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(Error::NodeNotFound(id))
    }

    /// Current value of a node
    pub fn read(&self, id: NodeId) -> Result<&Value> {
        Ok(&self.slot(id)?.current)
    }

    /// Prior values of a node
    pub fn history(&self, id: NodeId) -> Result<&History> {
        Ok(&self.slot(id)?.history)
    }

    /// Number of prior values a node can revert through
    pub fn history_depth(&self, id: NodeId) -> Result<usize> {
        Ok(self.slot(id)?.history.len())
    }

    /// Forget every prior value of a node
    pub fn clear_history(&mut self, id: NodeId) -> Result<()> {
        self.slot_mut(id)?.history.clear();
        Ok(())
    }

    /// Owning container of a node, if any
    pub fn node_owner(&self, id: NodeId) -> Result<Option<ContainerId>> {
        Ok(self.slot(id)?.owner)
    }

    /// History-aware write followed by propagation over the link table.
    ///
    /// The prior value is pushed onto the node's history, then every node
    /// reachable along value-carrying flow is written once, breadth-first in
    /// edge creation order. Pulse targets are notified instead of written.
    pub fn commit(&mut self, id: NodeId, value: impl Into<Value>) -> Result<PropagationReport> {
        let limit = self.config.history.limit;
        self.slot_mut(id)?.write(value.into(), limit, true);
        debug!(target: "photon::graph", node = %id, "commit");
        Ok(self.walk(id, Wave::Commit))
    }

    /// Restore the most recent prior value of a node.
    ///
    /// Local by default; with `RevertPolicy::Propagate` the rollback also
    /// reverts reachable Mirror/Gate peers. Revert never fires pulses.
    ///
    /// # Errors
    ///
    /// `EmptyHistory` when there is nothing to restore. The value is left
    /// unchanged and the graph stays usable.
    pub fn revert(&mut self, id: NodeId) -> Result<PropagationReport> {
        if !self.slot_mut(id)?.restore() {
            debug!(target: "photon::graph", node = %id, "revert with empty history");
            return Err(Error::EmptyHistory { node: id });
        }
        debug!(target: "photon::graph", node = %id, "revert");
        match self.config.propagation.revert {
            RevertPolicy::Local => Ok(PropagationReport::new(id)),
            RevertPolicy::Propagate => Ok(self.walk(id, Wave::Revert)),
        }
    }

    /// Destroy an unowned node, pruning its edges first.
    ///
    /// Owned nodes must be removed through their container.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Value> {
        if let Some(owner) = self.slot(id)?.owner {
            return Err(Error::AlreadyOwned {
                member: Member::Node(id),
                owner,
            });
        }
        self.destroy_node(id)
    }

    pub(crate) fn destroy_node(&mut self, id: NodeId) -> Result<Value> {
        let incident = self.slot(id)?.incident.clone();
        for edge in incident {
            self.unlink(edge)?;
        }
        self.listeners.remove(&id);
        let slot = self
            .nodes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(Error::NodeNotFound(id))?;
        debug!(target: "photon::graph", node = %id, "node destroyed");
        Ok(slot.current)
    }

    // ========== Pulse listeners ==========

    /// Register a callback fired when a Pulse edge delivers to `id`
    pub fn subscribe<F>(&mut self, id: NodeId, callback: F) -> Result<SubscriptionId>
    where
        F: FnMut(&PulseEvent) + 'static,
    {
        self.slot(id)?;
        let sub = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners
            .entry(id)
            .or_default()
            .push((sub, Box::new(callback)));
        Ok(sub)
    }

    /// Remove a callback; `false` if it was not registered on `id`
    pub fn unsubscribe(&mut self, id: NodeId, sub: SubscriptionId) -> bool {
        match self.listeners.get_mut(&id) {
            Some(subs) => {
                let before = subs.len();
                subs.retain(|(s, _)| *s != sub);
                before != subs.len()
            }
            None => false,
        }
    }

    // ========== Links ==========

    /// Add a raw edge between two live nodes
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: LinkKind) -> Result<EdgeId> {
        self.slot(source)?;
        self.slot(target)?;
        let edge = self.links.insert(source, target, kind);
        self.slot_mut(source)?.attach_edge(edge.id);
        if target != source {
            self.slot_mut(target)?.attach_edge(edge.id);
        }
        debug!(
            target: "photon::graph",
            edge = %edge.id,
            source = %source,
            target_node = %target,
            kind = %kind,
            "edge created"
        );
        Ok(edge.id)
    }

    /// Bidirectional mirror: one Mirror edge in each direction
    pub fn connect_mirror(&mut self, a: NodeId, b: NodeId) -> Result<[EdgeId; 2]> {
        let forward = self.add_edge(a, b, LinkKind::Mirror)?;
        let backward = self.add_edge(b, a, LinkKind::Mirror)?;
        Ok([forward, backward])
    }

    /// Gate declared on `a`; values flow `a → b`
    pub fn gate_into(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId> {
        self.add_edge(a, b, LinkKind::Gate(GateDirection::Forward))
    }

    /// Gate declared on `a`; values flow `b → a`
    pub fn gate_from(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId> {
        self.add_edge(a, b, LinkKind::Gate(GateDirection::Backward))
    }

    /// Notify-only edge; commits on `a` fire `b`'s listeners
    pub fn pulse_to(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId> {
        self.add_edge(a, b, LinkKind::Pulse)
    }

    /// Look up an edge
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.links.get(id).ok_or(Error::EdgeNotFound(id))
    }

    /// Remove one edge from the table and from both endpoints
    pub fn unlink(&mut self, id: EdgeId) -> Result<Edge> {
        let edge = self.links.remove(id).ok_or(Error::EdgeNotFound(id))?;
        for end in [edge.source, edge.target] {
            if let Some(slot) = self.nodes.get_mut(end.index()).and_then(Option::as_mut) {
                slot.detach_edge(id);
            }
        }
        Ok(edge)
    }

    /// Remove every edge joining `a` and `b`; returns how many were removed
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> Result<usize> {
        let joined: Vec<EdgeId> = self
            .slot(a)?
            .incident
            .iter()
            .copied()
            .filter(|e| self.links.get(*e).map_or(false, |edge| edge.joins(a, b)))
            .collect();
        for edge in &joined {
            self.unlink(*edge)?;
        }
        Ok(joined.len())
    }

    /// Every live edge in creation order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.links.iter()
    }

    /// Edges touching `id`, in creation order
    pub fn edges_of(&self, id: NodeId) -> Result<Vec<Edge>> {
        Ok(self
            .slot(id)?
            .incident
            .iter()
            .filter_map(|e| self.links.get(*e).copied())
            .collect())
    }
}
