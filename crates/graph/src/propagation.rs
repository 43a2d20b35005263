//! Propagation engine
//!
//! ## Algorithm
//!
//! A propagation epoch keeps two marks per node: written and notified. The
//! origin starts out written and enqueued. Each dequeued node `X` inspects its
//! incident edges in creation order and follows those whose flow leaves `X`:
//!
//! - Mirror / Gate: skip a target already written (this is what bounds cyclic
//!   topologies), otherwise write `X.current` into it, mark it, enqueue it
//! - Pulse: skip a target already notified, otherwise fire its listeners and
//!   mark it notified; never enqueue
//!
//! The two marks are independent, so a node reached by a pulse first can still
//! be written by a later Mirror/Gate edge in the same epoch. Every node is
//! written at most once and notified at most once per epoch, and the walk makes
//! O(edges) inspections with no recursion. An edge whose far endpoint is gone
//! is reported as a `DanglingEdge` diagnostic and the walk continues.
//!
//! A revert wave uses the same walk over Mirror/Gate flow, but each reached
//! peer restores its own history instead of receiving a copy.

use crate::config::HistoryPolicy;
use crate::graph::Graph;
use photon_core::{Error, NodeId, Value};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Delivered to pulse listeners
#[derive(Debug, Clone, PartialEq)]
pub struct PulseEvent {
    /// Node whose commit produced the pulse
    pub source: NodeId,
    /// Node whose listeners are firing
    pub target: NodeId,
    /// Value carried by the pulse; the target's own value is untouched
    pub value: Value,
}

/// Outcome of one propagation epoch
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationReport {
    /// Node the epoch started from
    pub origin: NodeId,
    /// Nodes written (or reverted), in breadth-first order
    pub written: Vec<NodeId>,
    /// Nodes whose pulse listeners fired, in order
    pub notified: Vec<NodeId>,
    /// Number of incident-edge inspections performed
    pub edge_visits: usize,
    /// Non-fatal conditions met along the way
    pub diagnostics: Vec<Error>,
}

impl PropagationReport {
    pub(crate) fn new(origin: NodeId) -> Self {
        Self {
            origin,
            written: Vec::new(),
            notified: Vec::new(),
            edge_visits: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Whether the epoch met no dangling edges or empty histories
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wave {
    Commit,
    Revert,
}

impl Graph {
    pub(crate) fn walk(&mut self, origin: NodeId, wave: Wave) -> PropagationReport {
        let mut report = PropagationReport::new(origin);
        let limit = self.config.history.limit;
        let record = self.config.history.policy == HistoryPolicy::Propagated;

        let mut written = vec![false; self.nodes.len()];
        let mut notified = vec![false; self.nodes.len()];
        written[origin.index()] = true;
        let mut queue = VecDeque::from([origin]);

        while let Some(x) = queue.pop_front() {
            let (value, incident) = match self.nodes.get(x.index()).and_then(Option::as_ref) {
                Some(slot) => (slot.current.clone(), slot.incident.clone()),
                None => continue,
            };

            for edge_id in incident {
                report.edge_visits += 1;
                let Some(edge) = self.links.get(edge_id).copied() else {
                    continue;
                };
                let Some(y) = edge.flow_from(x) else {
                    trace!(target: "photon::propagation", edge = %edge_id, from = %x, "against flow, skipped");
                    continue;
                };
                if wave == Wave::Revert && !edge.kind.writes() {
                    continue;
                }
                let marks = if edge.kind.writes() {
                    &mut written
                } else {
                    &mut notified
                };
                if marks.get(y.index()).copied().unwrap_or(false) {
                    continue;
                }
                let Some(target) = self.nodes.get_mut(y.index()).and_then(Option::as_mut) else {
                    warn!(
                        target: "photon::propagation",
                        edge = %edge_id,
                        missing = %y,
                        "Dangling edge during propagation, skipping"
                    );
                    report.diagnostics.push(Error::DanglingEdge {
                        edge: edge_id,
                        target: y,
                    });
                    continue;
                };
                marks[y.index()] = true;

                match wave {
                    Wave::Commit if edge.kind.writes() => {
                        trace!(target: "photon::propagation", edge = %edge_id, from = %x, to = %y, "write");
                        target.write(value.clone(), limit, record);
                        report.written.push(y);
                        queue.push_back(y);
                    }
                    Wave::Commit => {
                        trace!(target: "photon::propagation", edge = %edge_id, from = %x, to = %y, "pulse");
                        report.notified.push(y);
                        let event = PulseEvent {
                            source: x,
                            target: y,
                            value: value.clone(),
                        };
                        if let Some(subs) = self.listeners.get_mut(&y) {
                            for (_, callback) in subs.iter_mut() {
                                callback(&event);
                            }
                        }
                    }
                    Wave::Revert => {
                        if target.restore() {
                            report.written.push(y);
                            queue.push_back(y);
                        } else {
                            warn!(
                                target: "photon::propagation",
                                node = %y,
                                "Propagated revert reached a node with empty history"
                            );
                            report.diagnostics.push(Error::EmptyHistory { node: y });
                        }
                    }
                }
            }
        }

        debug!(
            target: "photon::propagation",
            origin = %origin,
            written = report.written.len(),
            notified = report.notified.len(),
            edge_visits = report.edge_visits,
            diagnostics = report.diagnostics.len(),
            "Propagation complete"
        );
        report
    }
}
