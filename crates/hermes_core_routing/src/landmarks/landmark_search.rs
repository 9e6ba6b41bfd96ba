use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{
    ch::core_graph::CoreGraph,
    constants::MAX_WEIGHT,
    graph::{DirectedEdgeAccess, GraphEdge},
    routing::search_direction::SearchDirection,
    types::NodeId,
    weighting::Weight,
};

#[derive(Eq, Copy, Clone, Debug)]
struct HeapItem {
    node_id: NodeId,
    weight: Weight,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.weight == other.weight && self.node_id == other.node_id
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
            .weight
            .cmp(&self.weight)
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

/// One to all Dijkstra inside the core, shortcuts included.
pub(crate) struct LandmarkSearch {
    heap: BinaryHeap<HeapItem>,
    weights: Vec<Weight>,
    settled: Vec<bool>,
}

impl LandmarkSearch {
    pub fn new(node_count: usize) -> Self {
        LandmarkSearch {
            heap: BinaryHeap::with_capacity(1024),
            weights: vec![MAX_WEIGHT; node_count],
            settled: vec![false; node_count],
        }
    }

    pub fn reset(&mut self) {
        self.heap.clear();
        self.weights.fill(MAX_WEIGHT);
        self.settled.fill(false);
    }

    /// Settles every core node reachable from `starts` and returns the last
    /// one settled, the farthest away.
    pub fn run(
        &mut self,
        core_graph: &CoreGraph,
        starts: &[NodeId],
        direction: SearchDirection,
    ) -> Option<NodeId> {
        for &start in starts {
            self.weights[start] = 0;
            self.heap.push(HeapItem {
                node_id: start,
                weight: 0,
            });
        }

        let mut last_settled = None;

        while let Some(HeapItem { node_id, weight }) = self.heap.pop() {
            if self.settled[node_id] || weight > self.weights[node_id] {
                continue;
            }

            self.settled[node_id] = true;
            last_settled = Some(node_id);

            let edges = match direction {
                SearchDirection::Forward => core_graph.outgoing_edges(node_id),
                SearchDirection::Backward => core_graph.incoming_edges(node_id),
            };

            for edge_id in edges {
                let Some(edge) = core_graph.edge(edge_id) else {
                    continue;
                };
                let adj_node = edge.adj_node(node_id);

                if self.settled[adj_node] {
                    continue;
                }

                let edge_weight = match direction {
                    SearchDirection::Forward => edge.weight_from(node_id),
                    SearchDirection::Backward => edge.weight_to(node_id),
                };

                if edge_weight == MAX_WEIGHT {
                    continue;
                }

                let next_weight = weight.saturating_add(edge_weight);
                if next_weight < self.weights[adj_node] {
                    self.weights[adj_node] = next_weight;
                    self.heap.push(HeapItem {
                        weight: next_weight,
                        node_id: adj_node,
                    });
                }
            }
        }

        last_settled
    }

    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    pub fn into_weights(self) -> Vec<Weight> {
        self.weights
    }
}
