use std::{cmp::Ordering, collections::BinaryHeap};

use fxhash::FxHashMap;

use crate::{
    constants::{INVALID_NODE, MAX_WEIGHT},
    graph::GraphEdge,
    types::NodeId,
    weighting::Weight,
};

use super::preparation_graph::PreparationGraph;

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

struct NodeData {
    settled: bool,
    weight: Weight,
}

/// Bounded Dijkstra from one neighbor of a contracted node, skipping the
/// contracted node itself. The state is kept between targets of the same
/// start node, so each target only resumes the search.
pub(crate) struct WitnessSearch {
    heap: BinaryHeap<HeapItem>,
    data: FxHashMap<NodeId, NodeData>,
    start_node: NodeId,
    avoid_node: NodeId,
    settled_nodes: usize,
}

impl WitnessSearch {
    pub fn new() -> Self {
        WitnessSearch {
            heap: BinaryHeap::default(),
            data: FxHashMap::default(),
            settled_nodes: 0,
            avoid_node: INVALID_NODE,
            start_node: INVALID_NODE,
        }
    }

    pub fn init(&mut self, start_node: NodeId, avoid_node: NodeId) {
        self.heap.clear();
        self.data.clear();

        self.start_node = start_node;
        self.avoid_node = avoid_node;
        self.settled_nodes = 0;

        self.heap.push(HeapItem {
            node_id: start_node,
            weight: 0,
        });
        self.data.insert(
            start_node,
            NodeData {
                weight: 0,
                settled: false,
            },
        );
    }

    #[inline(always)]
    fn is_settled(&self, node: NodeId) -> bool {
        self.data.get(&node).is_some_and(|data| data.settled)
    }

    #[inline(always)]
    fn current_shortest_weight(&self, node: NodeId) -> Weight {
        self.data.get(&node).map_or(MAX_WEIGHT, |data| data.weight)
    }

    /// Weight of the best path found to `target`, `MAX_WEIGHT` when the
    /// search stopped without reaching it. The search stops once a path of
    /// at most `max_weight` is known, once every remaining candidate is
    /// heavier than `max_weight`, or when `max_settled_nodes` is reached.
    pub fn compute_weight_upperbound(
        &mut self,
        graph: &PreparationGraph,
        target: NodeId,
        max_weight: Weight,
        max_settled_nodes: usize,
    ) -> Weight {
        if self.start_node == target {
            return 0;
        }

        if self.is_settled(target) || self.current_shortest_weight(target) <= max_weight {
            return self.current_shortest_weight(target);
        }

        // The head is only removed once it is known to be expanded, so a
        // later target with a larger bound resumes from a complete frontier.
        while let Some(&HeapItem { weight, node_id }) = self.heap.peek() {
            if self.settled_nodes >= max_settled_nodes || weight > max_weight {
                break;
            }

            self.heap.pop();

            if self.is_settled(node_id) {
                continue;
            }

            for &edge_id in graph.outgoing_edges(node_id) {
                let edge = graph.edge(edge_id);
                let adj_node = edge.adj_node(node_id);

                // A filter may reject restricted edges, they never prove a
                // shortcut redundant
                if adj_node == self.avoid_node || edge.restricted || self.is_settled(adj_node) {
                    continue;
                }

                let edge_weight = edge.weight_from(node_id);
                if edge_weight == MAX_WEIGHT {
                    continue;
                }

                let next_weight = weight.saturating_add(edge_weight);
                if next_weight < self.current_shortest_weight(adj_node) {
                    self.data.insert(
                        adj_node,
                        NodeData {
                            weight: next_weight,
                            settled: false,
                        },
                    );
                    self.heap.push(HeapItem {
                        weight: next_weight,
                        node_id: adj_node,
                    });
                }
            }

            self.settled_nodes += 1;
            if let Some(data) = self.data.get_mut(&node_id) {
                data.settled = true;
            }

            if node_id == target || self.current_shortest_weight(target) <= max_weight {
                break;
            }
        }

        self.current_shortest_weight(target)
    }
}
