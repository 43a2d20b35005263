//! Fluent node handles
//!
//! A `NodeMut` borrows the graph exclusively, so the node it points at stays
//! live for the handle's lifetime. Link methods pick the returned endpoint by
//! name: `gate_from` hands back the argument, the others hand back `self`.
//!
//! ```ignore
//! // target → middle → source
//! graph.node_mut(source)?.gate_from(middle)?.gate_from(target)?;
//! ```

use crate::graph::Graph;
use crate::propagation::PropagationReport;
use photon_core::{NodeId, Result, Value};

static NULL: Value = Value::Null;

/// Exclusive, chainable handle on one node
#[derive(Debug)]
pub struct NodeMut<'g> {
    graph: &'g mut Graph,
    id: NodeId,
    last: Option<PropagationReport>,
}

impl Graph {
    /// Borrow a chainable handle on a live node
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.slot(id)?;
        Ok(NodeMut {
            graph: self,
            id,
            last: None,
        })
    }
}

impl<'g> NodeMut<'g> {
    /// Handle of the node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current value
    pub fn read(&self) -> &Value {
        self.graph.read(self.id).unwrap_or(&NULL)
    }

    /// Number of prior values
    pub fn history_depth(&self) -> usize {
        self.graph.history_depth(self.id).unwrap_or(0)
    }

    /// Commit a value and propagate it; the report is kept for [`Self::last_report`]
    pub fn commit(mut self, value: impl Into<Value>) -> Result<Self> {
        self.last = Some(self.graph.commit(self.id, value)?);
        Ok(self)
    }

    /// Revert to the prior value; fails with `EmptyHistory` when there is none
    pub fn revert(mut self) -> Result<Self> {
        self.last = Some(self.graph.revert(self.id)?);
        Ok(self)
    }

    /// Mirror with `other`; returns this node
    pub fn connect_mirror(self, other: NodeId) -> Result<Self> {
        self.graph.connect_mirror(self.id, other)?;
        Ok(self)
    }

    /// Gate this node into `other`; returns this node
    pub fn gate_into(self, other: NodeId) -> Result<Self> {
        self.graph.gate_into(self.id, other)?;
        Ok(self)
    }

    /// Gate `other` into this node; returns the handle on `other`
    pub fn gate_from(self, other: NodeId) -> Result<NodeMut<'g>> {
        self.graph.gate_from(self.id, other)?;
        Ok(NodeMut {
            graph: self.graph,
            id: other,
            last: None,
        })
    }

    /// Pulse `other` on every commit; returns this node
    pub fn pulse_to(self, other: NodeId) -> Result<Self> {
        self.graph.pulse_to(self.id, other)?;
        Ok(self)
    }

    /// Report of the most recent commit or revert made through this handle
    pub fn last_report(&self) -> Option<&PropagationReport> {
        self.last.as_ref()
    }
}
