use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::NodeId;

/// A pending node and the tentative distance it was inserted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierEntry {
    pub node: NodeId,
    pub priority: f64,
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; equal priorities pop the lower node first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Min-priority queue of pending nodes.
///
/// Lowering a node's priority is done by inserting a second entry; the
/// superseded one stays in the heap until popped. Callers recognise those
/// stale entries by checking whether the node is already settled.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, node: NodeId, priority: f64) {
        self.heap.push(FrontierEntry { node, priority });
    }

    /// Remove and return the entry with the smallest priority.
    pub fn extract_min(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
