//! Link table: a directed multigraph over node handles
//!
//! Edges are plain `(source, target, kind)` records indexed by `EdgeId`. The
//! id doubles as the creation index, so iterating the table (or a node's
//! incident list) in id order is iterating in creation order.

use photon_core::{EdgeId, LinkKind, NodeId};

/// One link table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Handle and creation index
    pub id: EdgeId,
    /// Declaring endpoint
    pub source: NodeId,
    /// Other endpoint
    pub target: NodeId,
    /// Propagation kind
    pub kind: LinkKind,
}

impl Edge {
    /// Endpoint that receives flow when `from` changes, if the edge carries
    /// flow out of `from` at all.
    pub fn flow_from(&self, from: NodeId) -> Option<NodeId> {
        if self.kind.flows_forward() {
            (self.source == from).then_some(self.target)
        } else {
            (self.target == from).then_some(self.source)
        }
    }

    /// Whether the edge touches `node`
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// Whether the edge joins `a` and `b`, in either orientation
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LinkTable {
    edges: Vec<Option<Edge>>,
    live: usize,
}

impl LinkTable {
    pub(crate) fn insert(&mut self, source: NodeId, target: NodeId, kind: LinkKind) -> Edge {
        let id = EdgeId::from_index(self.edges.len() as u32);
        let edge = Edge {
            id,
            source,
            target,
            kind,
        };
        self.edges.push(Some(edge));
        self.live += 1;
        edge
    }

    pub(crate) fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn remove(&mut self, id: EdgeId) -> Option<Edge> {
        let removed = self.edges.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Live edges in creation order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter_map(Option::as_ref)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::GateDirection;

    fn n(i: u32) -> NodeId {
        NodeId::from_index(i)
    }

    #[test]
    fn test_flow_rules() {
        let mut table = LinkTable::default();
        let mirror = table.insert(n(0), n(1), LinkKind::Mirror);
        let fwd = table.insert(n(0), n(1), LinkKind::Gate(GateDirection::Forward));
        let back = table.insert(n(0), n(1), LinkKind::Gate(GateDirection::Backward));
        let pulse = table.insert(n(0), n(1), LinkKind::Pulse);

        assert_eq!(mirror.flow_from(n(0)), Some(n(1)));
        assert_eq!(mirror.flow_from(n(1)), None);
        assert_eq!(fwd.flow_from(n(0)), Some(n(1)));
        assert_eq!(fwd.flow_from(n(1)), None);
        assert_eq!(back.flow_from(n(0)), None);
        assert_eq!(back.flow_from(n(1)), Some(n(0)));
        assert_eq!(pulse.flow_from(n(0)), Some(n(1)));
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut table = LinkTable::default();
        let a = table.insert(n(0), n(1), LinkKind::Mirror);
        let b = table.insert(n(1), n(0), LinkKind::Mirror);
        assert!(a.id < b.id);
        let order: Vec<_> = table.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a.id, b.id]);
    }

    #[test]
    fn test_remove_never_reuses_ids() {
        let mut table = LinkTable::default();
        let a = table.insert(n(0), n(1), LinkKind::Pulse);
        assert_eq!(table.remove(a.id), Some(a));
        assert_eq!(table.remove(a.id), None);
        assert_eq!(table.len(), 0);
        let b = table.insert(n(0), n(1), LinkKind::Pulse);
        assert_ne!(a.id, b.id);
        assert!(table.get(a.id).is_none());
    }

    #[test]
    fn test_joins_and_touches() {
        let mut table = LinkTable::default();
        let e = table.insert(n(2), n(5), LinkKind::Mirror);
        assert!(e.joins(n(5), n(2)));
        assert!(!e.joins(n(2), n(3)));
        assert!(e.touches(n(5)));
        assert!(!e.touches(n(0)));
    }
}
