//! Node slots and bounded value history
//!
//! A node holds its current value and a LIFO stack of prior values. The stack
//! is bounded: when a push would exceed the configured depth, the oldest
//! entry is discarded.

use photon_core::{ContainerId, EdgeId, Value};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Prior values of a node, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: VecDeque<Value>,
}

impl History {
    /// Push a prior value, dropping the oldest entry if `limit` is reached.
    ///
    /// A `limit` of 0 means unbounded.
    pub(crate) fn push(&mut self, value: Value, limit: usize) {
        if limit > 0 {
            while self.entries.len() >= limit {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(value);
    }

    /// Pop the most recent prior value
    pub(crate) fn pop(&mut self) -> Option<Value> {
        self.entries.pop_back()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored prior values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to revert to
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value the next `revert` would restore
    pub fn latest(&self) -> Option<&Value> {
        self.entries.back()
    }

    /// Iterate prior values from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.entries.iter()
    }
}

/// Arena slot for a live node
#[derive(Debug, Clone)]
pub(crate) struct NodeSlot {
    pub(crate) current: Value,
    pub(crate) history: History,
    /// Edges touching this node, in creation order
    pub(crate) incident: SmallVec<[EdgeId; 4]>,
    pub(crate) owner: Option<ContainerId>,
}

impl NodeSlot {
    pub(crate) fn new(value: Value) -> Self {
        Self {
            current: value,
            history: History::default(),
            incident: SmallVec::new(),
            owner: None,
        }
    }

    /// History-aware write: the prior value is pushed when `record` is set
    pub(crate) fn write(&mut self, value: Value, limit: usize, record: bool) {
        let prior = std::mem::replace(&mut self.current, value);
        if record {
            self.history.push(prior, limit);
        }
    }

    /// Restore the most recent prior value; `false` if the history is empty
    pub(crate) fn restore(&mut self) -> bool {
        match self.history.pop() {
            Some(prior) => {
                self.current = prior;
                true
            }
            None => false,
        }
    }

    /// Record an incident edge; edges are created in increasing id order
    pub(crate) fn attach_edge(&mut self, edge: EdgeId) {
        debug_assert!(self.incident.last().map_or(true, |last| *last < edge));
        self.incident.push(edge);
    }

    pub(crate) fn detach_edge(&mut self, edge: EdgeId) {
        self.incident.retain(|e| *e != edge);
    }
}
