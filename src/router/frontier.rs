use crate::NodeId;
use std::cmp::Ordering;

/// The open set of a search: a binary min-heap of nodes keyed by their
/// estimated total cost.
///
/// Equal keys are popped in insertion order, so a search always expands nodes
/// in the same order given the same inputs.
#[derive(Clone, Debug, Default)]
pub(crate) struct PriorityFrontier {
    heap: Vec<Entry>,
    /// The sequence number given to the next inserted node.
    seq: u64,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    /// The estimated total cost of a route through the node.
    f: f64,
    /// The order in which the node was inserted.
    seq: u64,
    node: NodeId,
}

impl Entry {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PriorityFrontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether the frontier is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The number of nodes in the frontier.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// The smallest key in the frontier.
    pub fn peek_key(&self) -> Option<f64> {
        self.heap.first().map(|e| e.f)
    }

    /// Adds a node with the given key.
    /// The node must not already be in the frontier.
    pub fn insert(&mut self, node: NodeId, f: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Entry { f, seq, node });
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes the node with the smallest key.
    pub fn extract_min(&mut self) -> Option<(NodeId, f64)> {
        let last = self.heap.pop()?;
        let min = match self.heap.first_mut() {
            Some(first) => std::mem::replace(first, last),
            None => return Some((last.node, last.f)),
        };
        self.sift_down(0);
        Some((min.node, min.f))
    }

    /// Lowers the key of a node already in the frontier.
    /// Returns false if the node isn't in the frontier.
    pub fn decrease_key(&mut self, node: NodeId, f: f64) -> bool {
        let Some(idx) = self.heap.iter().position(|e| e.node == node) else {
            return false;
        };
        let entry = &mut self.heap[idx];
        if f > entry.f {
            log::warn!("Ignoring key increase for node {} ({} > {})", node.0, f, entry.f);
            return true;
        }
        entry.f = f;
        self.sift_up(idx);
        true
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].cmp_key(&self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.heap[left].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && self.heap[right].cmp_key(&self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}
