use crate::{
    constants::{MAX_DURATION, MAX_WEIGHT},
    distance::{Distance, Meters},
    edge_direction::EdgeDirection,
    graph::{Graph, GraphEdge, GraphStore},
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight, Weighting},
};

use super::{core_restrictions::CoreRestrictions, shortcut::Shortcut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreparationEdgeKind {
    Base,
    Shortcut {
        incoming_edge: EdgeId,
        outgoing_edge: EdgeId,
    },
}

/// Edge of the graph being contracted. Base edges keep the id of the store
/// edge they come from, shortcuts are numbered after the last store edge.
#[derive(Debug, Clone)]
pub(crate) struct PreparationEdge {
    pub start: NodeId,
    pub end: NodeId,
    pub distance: Distance<Meters>,
    pub forward_weight: Weight,
    pub backward_weight: Weight,
    pub forward_time: Milliseconds,
    pub backward_time: Milliseconds,
    pub original_edges: usize,
    /// Base edge a filter may reject, never usable as a witness.
    pub restricted: bool,
    pub kind: PreparationEdgeKind,
}

impl PreparationEdge {
    /// Weight of the edge when leaving `node`.
    pub fn weight_from(&self, node: NodeId) -> Weight {
        if node == self.start {
            self.forward_weight
        } else {
            self.backward_weight
        }
    }

    pub fn time_from(&self, node: NodeId) -> Milliseconds {
        if node == self.start {
            self.forward_time
        } else {
            self.backward_time
        }
    }

    pub fn direction_from(&self, node: NodeId) -> EdgeDirection {
        if node == self.start {
            EdgeDirection::Forward
        } else {
            EdgeDirection::Backward
        }
    }
}

impl GraphEdge for PreparationEdge {
    fn start_node(&self) -> NodeId {
        self.start
    }

    fn end_node(&self) -> NodeId {
        self.end
    }

    fn distance(&self) -> Distance<Meters> {
        self.distance
    }
}

/// Directed view of the store under one weighting, from which contracted
/// nodes are removed one by one.
pub(crate) struct PreparationGraph {
    edges: Vec<PreparationEdge>,
    outgoing_edges: Vec<Vec<EdgeId>>,
    incoming_edges: Vec<Vec<EdgeId>>,
    base_edge_count: usize,
}

impl PreparationGraph {
    pub fn new(
        store: &GraphStore,
        weighting: &dyn Weighting,
        restrictions: &CoreRestrictions,
    ) -> Self {
        let node_count = store.node_count();
        let mut graph = PreparationGraph {
            edges: Vec::with_capacity(store.edge_count()),
            outgoing_edges: vec![Vec::new(); node_count],
            incoming_edges: vec![Vec::new(); node_count],
            base_edge_count: store.edge_count(),
        };

        for edge in store.edges() {
            let forward_weight = weighting.calc_edge_weight(edge, EdgeDirection::Forward);
            let backward_weight = weighting.calc_edge_weight(edge, EdgeDirection::Backward);

            let edge_id = graph.edges.len();
            graph.edges.push(PreparationEdge {
                start: edge.start_node(),
                end: edge.end_node(),
                distance: edge.distance(),
                forward_weight,
                backward_weight,
                forward_time: weighting.calc_edge_ms(edge, EdgeDirection::Forward),
                backward_time: weighting.calc_edge_ms(edge, EdgeDirection::Backward),
                original_edges: 1,
                restricted: restrictions.requires_inspection(store.edge_attributes(edge.id())),
                kind: PreparationEdgeKind::Base,
            });

            // Self loops never belong to a shortest path
            if edge.start_node() == edge.end_node() {
                continue;
            }

            if forward_weight != MAX_WEIGHT {
                graph.outgoing_edges[edge.start_node()].push(edge_id);
                graph.incoming_edges[edge.end_node()].push(edge_id);
            }

            if backward_weight != MAX_WEIGHT {
                graph.incoming_edges[edge.start_node()].push(edge_id);
                graph.outgoing_edges[edge.end_node()].push(edge_id);
            }
        }

        graph
    }

    pub fn node_count(&self) -> usize {
        self.outgoing_edges.len()
    }

    pub fn base_edge_count(&self) -> usize {
        self.base_edge_count
    }

    pub fn edge(&self, edge_id: EdgeId) -> &PreparationEdge {
        &self.edges[edge_id]
    }

    pub fn is_accessible(&self, edge_id: EdgeId) -> bool {
        let edge = &self.edges[edge_id];
        edge.start != edge.end
            && (edge.forward_weight != MAX_WEIGHT || edge.backward_weight != MAX_WEIGHT)
    }

    pub fn outgoing_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.outgoing_edges[node]
    }

    pub fn incoming_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.incoming_edges[node]
    }

    /// Number of distinct edges still attached to `node`.
    pub fn node_degree(&self, node: NodeId) -> usize {
        let outgoing = &self.outgoing_edges[node];
        outgoing.len()
            + self.incoming_edges[node]
                .iter()
                .filter(|edge_id| !outgoing.contains(edge_id))
                .count()
    }

    /// Distinct nodes sharing an edge with `node`.
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors: Vec<NodeId> = self.outgoing_edges[node]
            .iter()
            .chain(self.incoming_edges[node].iter())
            .map(|&edge_id| self.edges[edge_id].adj_node(node))
            .filter(|&adj_node| adj_node != node)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    pub fn mean_degree(&self) -> f32 {
        let attached: usize = self.outgoing_edges.iter().map(Vec::len).sum();
        let active = self
            .outgoing_edges
            .iter()
            .zip(&self.incoming_edges)
            .filter(|(outgoing, incoming)| !outgoing.is_empty() || !incoming.is_empty())
            .count();

        if active == 0 {
            return 0.0;
        }

        attached as f32 / active as f32
    }

    /// Appends the shortcut as a one-directional edge and returns its id.
    pub fn add_shortcut(&mut self, shortcut: &Shortcut) -> EdgeId {
        let edge_id = self.edges.len();
        debug_assert_eq!(edge_id, shortcut.id);

        self.edges.push(PreparationEdge {
            start: shortcut.start,
            end: shortcut.end,
            distance: shortcut.distance,
            forward_weight: shortcut.weight,
            backward_weight: MAX_WEIGHT,
            forward_time: shortcut.time,
            backward_time: MAX_DURATION,
            original_edges: shortcut.original_edges,
            restricted: false,
            kind: PreparationEdgeKind::Shortcut {
                incoming_edge: shortcut.incoming_edge,
                outgoing_edge: shortcut.outgoing_edge,
            },
        });
        self.outgoing_edges[shortcut.start].push(edge_id);
        self.incoming_edges[shortcut.end].push(edge_id);

        edge_id
    }

    /// Id the next shortcut will get.
    pub fn next_edge_id(&self) -> EdgeId {
        self.edges.len()
    }

    /// Removes `node` from the adjacency of its neighbors.
    pub fn disconnect_node(&mut self, node: NodeId) {
        let outgoing = std::mem::take(&mut self.outgoing_edges[node]);
        let incoming = std::mem::take(&mut self.incoming_edges[node]);

        for edge_id in outgoing.iter().chain(incoming.iter()) {
            let adj_node = self.edges[*edge_id].adj_node(node);
            self.outgoing_edges[adj_node].retain(|id| id != edge_id);
            self.incoming_edges[adj_node].retain(|id| id != edge_id);
        }
    }

    pub fn into_edges(self) -> Vec<PreparationEdge> {
        self.edges
    }
}
