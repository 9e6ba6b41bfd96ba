use std::{cmp::Ordering, collections::BinaryHeap};

use fxhash::{FxBuildHasher, FxHashMap};

use crate::{
    constants::{INVALID_EDGE, INVALID_NODE, MAX_WEIGHT},
    types::{EdgeId, NodeId},
    weighting::Weight,
};

#[derive(Eq, Copy, Clone, Debug)]
pub(crate) struct HeapItem {
    pub node_id: NodeId,

    /// Current cheapest weight from the root of the search to `node_id`
    pub g_score: Weight,

    /// `g_score` plus the heuristic value, equal to `g_score` without one
    pub f_score: Weight,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.f_score == other.f_score && self.g_score == other.g_score
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip weight to make this a min-heap
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.g_score.cmp(&self.g_score))
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

pub(crate) struct NodeData {
    pub settled: bool,
    pub weight: Weight,
    pub parent: NodeId,
    /// Edge from `parent` to the node
    pub edge_id: EdgeId,
}

/// Labels and open set of one direction of a bidirectional search.
pub(crate) struct SearchSpace {
    heap: BinaryHeap<HeapItem>,
    data: FxHashMap<NodeId, NodeData>,
}

impl SearchSpace {
    pub fn new() -> Self {
        SearchSpace {
            heap: BinaryHeap::with_capacity(1024),
            data: FxHashMap::with_capacity_and_hasher(1024, FxBuildHasher::default()),
        }
    }

    pub fn init(&mut self, root: NodeId) {
        self.heap.clear();
        self.data.clear();
        self.update(root, 0, INVALID_NODE, INVALID_EDGE);
    }

    pub fn clear_heap(&mut self) {
        self.heap.clear();
    }

    pub fn update(&mut self, node: NodeId, weight: Weight, parent: NodeId, edge_id: EdgeId) {
        self.data.insert(
            node,
            NodeData {
                settled: false,
                weight,
                parent,
                edge_id,
            },
        );
    }

    pub fn push(&mut self, node_id: NodeId, g_score: Weight, f_score: Weight) {
        self.heap.push(HeapItem {
            node_id,
            g_score,
            f_score,
        });
    }

    pub fn pop(&mut self) -> Option<HeapItem> {
        self.heap.pop()
    }

    /// Smallest key of the open set.
    pub fn min_key(&self) -> Option<Weight> {
        self.heap.peek().map(|item| item.f_score)
    }

    pub fn open_len(&self) -> usize {
        self.heap.len()
    }

    #[inline(always)]
    pub fn weight(&self, node: NodeId) -> Weight {
        self.data.get(&node).map_or(MAX_WEIGHT, |data| data.weight)
    }

    #[inline(always)]
    pub fn is_settled(&self, node: NodeId) -> bool {
        self.data.get(&node).is_some_and(|data| data.settled)
    }

    pub fn settle(&mut self, node: NodeId) {
        if let Some(data) = self.data.get_mut(&node) {
            data.settled = true;
        }
    }

    /// Whether the item still holds the current label of its node.
    pub fn is_current(&self, item: &HeapItem) -> bool {
        !self.is_settled(item.node_id) && item.g_score <= self.weight(item.node_id)
    }

    /// Edges from the root to `node` in travel order, each with the node it
    /// is traversed from.
    pub fn path_from_root(&self, node: NodeId) -> Vec<(EdgeId, NodeId)> {
        let mut path = Vec::new();
        let mut current_node = node;

        while let Some(node_data) = self.data.get(&current_node) {
            if node_data.parent == INVALID_NODE {
                break;
            }

            path.push((node_data.edge_id, node_data.parent));
            current_node = node_data.parent;
        }

        path.reverse();
        path
    }

    /// Edges from `node` to the root of a backward search in travel order,
    /// each with the node it is traversed from.
    pub fn path_to_root(&self, node: NodeId) -> Vec<(EdgeId, NodeId)> {
        let mut path = Vec::new();
        let mut current_node = node;

        while let Some(node_data) = self.data.get(&current_node) {
            if node_data.parent == INVALID_NODE {
                break;
            }

            path.push((node_data.edge_id, current_node));
            current_node = node_data.parent;
        }

        path
    }
}
