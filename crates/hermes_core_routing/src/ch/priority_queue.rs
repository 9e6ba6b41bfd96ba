use thiserror::Error;

use crate::types::NodeId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PriorityQueueError {
    #[error("Node {node} is already queued")]
    ElementAlreadyExists { node: NodeId },
    #[error("Node {node} is out of bounds, the queue holds {node_count} nodes")]
    OutOfBounds { node: NodeId, node_count: usize },
}

/// Min-heap of nodes waiting for contraction, keyed by contraction priority.
///
/// Equal priorities pop in node id order so that a preparation is
/// reproducible.
pub struct ContractionQueue {
    heap: Vec<NodeId>,
    priorities: Vec<i32>,
    positions: Vec<Option<usize>>,
}

impl ContractionQueue {
    pub fn new(node_count: usize) -> Self {
        ContractionQueue {
            heap: Vec::with_capacity(node_count),
            priorities: vec![0; node_count],
            positions: vec![None; node_count],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.get(node).is_some_and(Option::is_some)
    }

    pub fn priority(&self, node: NodeId) -> Option<i32> {
        self.contains(node).then(|| self.priorities[node])
    }

    pub fn insert(&mut self, node: NodeId, priority: i32) -> Result<(), PriorityQueueError> {
        if node >= self.positions.len() {
            return Err(PriorityQueueError::OutOfBounds {
                node,
                node_count: self.positions.len(),
            });
        }

        if self.contains(node) {
            return Err(PriorityQueueError::ElementAlreadyExists { node });
        }

        self.priorities[node] = priority;
        self.heap.push(node);
        self.positions[node] = Some(self.heap.len() - 1);
        self.sift_up(self.heap.len() - 1);

        Ok(())
    }

    pub fn head(&self) -> Option<(NodeId, i32)> {
        self.heap.first().map(|&node| (node, self.priorities[node]))
    }

    pub fn pop(&mut self) -> Option<(NodeId, i32)> {
        let head = self.head()?;
        self.remove_at(0);
        Some(head)
    }

    /// Changes the priority of a queued node, unknown nodes are ignored.
    pub fn change_priority(&mut self, node: NodeId, priority: i32) {
        let Some(position) = self.positions.get(node).copied().flatten() else {
            return;
        };

        let previous = self.priorities[node];
        self.priorities[node] = priority;
        if priority < previous {
            self.sift_up(position);
        } else if priority > previous {
            self.sift_down(position);
        }
    }

    /// Empties the queue and returns its nodes, best candidate first.
    pub fn drain(&mut self) -> Vec<NodeId> {
        let mut nodes = std::mem::take(&mut self.heap);
        for &node in &nodes {
            self.positions[node] = None;
        }
        nodes.sort_unstable_by_key(|&node| (self.priorities[node], node));
        nodes
    }

    fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        (self.priorities[a], a) < (self.priorities[b], b)
    }

    fn remove_at(&mut self, position: usize) {
        let node = self.heap.swap_remove(position);
        self.positions[node] = None;

        if position < self.heap.len() {
            self.positions[self.heap[position]] = Some(position);
            self.sift_down(position);
            self.sift_up(position);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = Some(a);
        self.positions[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.precedes(self.heap[position], self.heap[parent]) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            let right = left + 1;

            let mut best = position;
            if left < self.heap.len() && self.precedes(self.heap[left], self.heap[best]) {
                best = left;
            }
            if right < self.heap.len() && self.precedes(self.heap[right], self.heap[best]) {
                best = right;
            }

            if best == position {
                break;
            }
            self.swap(position, best);
            position = best;
        }
    }
}
