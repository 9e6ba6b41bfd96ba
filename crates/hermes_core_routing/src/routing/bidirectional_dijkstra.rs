use tracing::trace;

use crate::{
    constants::{INVALID_EDGE, INVALID_NODE, MAX_WEIGHT},
    filters::EdgeFilterChain,
    graph::{Graph, GraphEdge, GraphStore},
    types::NodeId,
    weighting::{Weight, Weighting},
};

use super::{
    search_direction::SearchDirection,
    search_space::SearchSpace,
    shortest_path_algorithm::{SearchResult, ShortestPathAlgorithm},
};

/// Bidirectional Dijkstra over the original edges of the store. Every edge
/// goes through the filter chain in the direction it is traversed.
pub(crate) struct BidirectionalDijkstra<'a> {
    store: &'a GraphStore,
    weighting: &'a dyn Weighting,
    filters: &'a EdgeFilterChain,
    max_visited_nodes: usize,

    forward: SearchSpace,
    backward: SearchSpace,

    best_meeting_node: NodeId,
    best_path_weight: Weight,
    visited_nodes: usize,
}

impl<'a> BidirectionalDijkstra<'a> {
    pub fn new(
        store: &'a GraphStore,
        weighting: &'a dyn Weighting,
        filters: &'a EdgeFilterChain,
        max_visited_nodes: usize,
    ) -> Self {
        BidirectionalDijkstra {
            store,
            weighting,
            filters,
            max_visited_nodes,
            forward: SearchSpace::new(),
            backward: SearchSpace::new(),
            best_meeting_node: INVALID_NODE,
            best_path_weight: MAX_WEIGHT,
            visited_nodes: 0,
        }
    }

    fn init(&mut self, start: NodeId, end: NodeId) {
        self.forward.init(start);
        self.forward.push(start, 0, 0);
        self.backward.init(end);
        self.backward.push(end, 0, 0);

        self.best_meeting_node = INVALID_NODE;
        self.best_path_weight = MAX_WEIGHT;
        self.visited_nodes = 0;
    }

    fn process_node(&mut self, dir: SearchDirection, node: NodeId, weight: Weight) {
        let (space, opposite_space) = match dir {
            SearchDirection::Forward => (&mut self.forward, &self.backward),
            SearchDirection::Backward => (&mut self.backward, &self.forward),
        };

        for edge_id in self.store.node_edges_iter(node) {
            let edge = self.store.edge(edge_id);
            let adj_node = edge.adj_node(node);

            if adj_node == node || space.is_settled(adj_node) {
                continue;
            }

            // Backward searches traverse edges towards `node`
            let edge_direction = match dir {
                SearchDirection::Forward => self.store.edge_direction(edge_id, node),
                SearchDirection::Backward => self.store.edge_direction(edge_id, adj_node),
            };

            let edge_weight = self.weighting.calc_edge_weight(edge, edge_direction);
            if edge_weight == MAX_WEIGHT || !self.filters.accept(self.store, edge, edge_direction) {
                continue;
            }

            let next_weight = weight.saturating_add(edge_weight);
            if next_weight < space.weight(adj_node) {
                space.update(adj_node, next_weight, node, edge_id);
                space.push(adj_node, next_weight, next_weight);
            }

            let opposite_weight = opposite_space.weight(adj_node);
            if opposite_weight != MAX_WEIGHT {
                let total_weight = space.weight(adj_node).saturating_add(opposite_weight);
                if total_weight < self.best_path_weight {
                    self.best_path_weight = total_weight;
                    self.best_meeting_node = adj_node;
                }
            }
        }

        space.settle(node);
    }
}

impl ShortestPathAlgorithm for BidirectionalDijkstra<'_> {
    fn calc_path(&mut self, start: NodeId, end: NodeId) -> SearchResult {
        if start == end {
            return SearchResult::Found {
                weight: 0,
                edges: Vec::new(),
                visited_nodes: 0,
            };
        }

        self.init(start, end);

        loop {
            let forward_min = self.forward.min_key().unwrap_or(MAX_WEIGHT);
            let backward_min = self.backward.min_key().unwrap_or(MAX_WEIGHT);

            // Also ends the search once a direction runs out of nodes
            if forward_min.saturating_add(backward_min) >= self.best_path_weight {
                break;
            }

            let dir = if backward_min < forward_min {
                SearchDirection::Backward
            } else {
                SearchDirection::Forward
            };

            let space = match dir {
                SearchDirection::Forward => &mut self.forward,
                SearchDirection::Backward => &mut self.backward,
            };

            let Some(item) = space.pop() else {
                break;
            };

            if !space.is_current(&item) {
                continue;
            }

            if self.visited_nodes >= self.max_visited_nodes {
                trace!(visited_nodes = self.visited_nodes, "Bidirectional dijkstra aborted");
                return SearchResult::Aborted {
                    visited_nodes: self.visited_nodes,
                };
            }

            self.visited_nodes += 1;
            self.process_node(dir, item.node_id, item.g_score);
        }

        if self.best_meeting_node == INVALID_NODE {
            return SearchResult::NoPath {
                visited_nodes: self.visited_nodes,
            };
        }

        let mut edges = self.forward.path_from_root(self.best_meeting_node);
        edges.extend(self.backward.path_to_root(self.best_meeting_node));
        debug_assert!(edges.iter().all(|(edge_id, _)| *edge_id != INVALID_EDGE));

        SearchResult::Found {
            weight: self.best_path_weight,
            edges,
            visited_nodes: self.visited_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        filters::{AvoidBordersEdgeFilter, BorderRule},
        test_graph_utils::test_graph::{
            RomaniaGraphCity, border_graph, car_profile, car_weighting, line_graph, romania_graph,
        },
        weighting::ShortestWeighting,
    };

    use super::*;

    #[test]
    fn should_find_shortest_paths() {
        let store = romania_graph();
        let weighting = ShortestWeighting::new(&car_profile(), 0);
        let filters = EdgeFilterChain::new();
        let mut dijkstra = BidirectionalDijkstra::new(&store, &weighting, &filters, 1_000);

        let result = dijkstra.calc_path(RomaniaGraphCity::Oradea.into(), RomaniaGraphCity::Bucharest.into());
        let SearchResult::Found { weight, edges, .. } = result else {
            panic!("expected a path, got {result:?}");
        };
        assert_eq!(weight, 429_000);
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0].1, usize::from(RomaniaGraphCity::Oradea));

        let result = dijkstra.calc_path(RomaniaGraphCity::Iasi.into(), RomaniaGraphCity::Timisoara.into());
        assert!(matches!(result, SearchResult::Found { weight: 855_000, .. }));
    }

    #[test]
    fn path_edges_should_chain_from_start_to_end() {
        let store = romania_graph();
        let weighting = car_weighting(&store);
        let filters = EdgeFilterChain::new();
        let mut dijkstra = BidirectionalDijkstra::new(&store, weighting.as_ref(), &filters, 1_000);

        let start: NodeId = RomaniaGraphCity::Neamt.into();
        let end: NodeId = RomaniaGraphCity::Dobreta.into();
        let SearchResult::Found { edges, .. } = dijkstra.calc_path(start, end) else {
            panic!("expected a path");
        };

        let mut node = start;
        for (edge_id, from) in edges {
            assert_eq!(from, node);
            node = store.edge(edge_id).adj_node(from);
        }
        assert_eq!(node, end);
    }

    #[test]
    fn should_respect_the_visited_nodes_ceiling() {
        let store = line_graph(50);
        let weighting = car_weighting(&store);
        let filters = EdgeFilterChain::new();
        let mut dijkstra = BidirectionalDijkstra::new(&store, weighting.as_ref(), &filters, 10);

        assert_eq!(
            dijkstra.calc_path(0, 49),
            SearchResult::Aborted { visited_nodes: 10 }
        );
        assert!(matches!(dijkstra.calc_path(0, 4), SearchResult::Found { .. }));
        assert_eq!(
            dijkstra.calc_path(7, 7),
            SearchResult::Found {
                weight: 0,
                edges: vec![],
                visited_nodes: 0
            }
        );
    }

    #[test]
    fn filtered_edges_should_not_be_used() {
        let (store, border_edge) = border_graph();
        let weighting = car_weighting(&store);

        let filters = EdgeFilterChain::new().with(AvoidBordersEdgeFilter::new(BorderRule::AvoidAll));
        let mut dijkstra = BidirectionalDijkstra::new(&store, weighting.as_ref(), &filters, 1_000);
        assert!(matches!(dijkstra.calc_path(0, 5), SearchResult::NoPath { .. }));
        assert!(matches!(dijkstra.calc_path(0, 2), SearchResult::Found { .. }));

        let no_filters = EdgeFilterChain::new();
        let mut dijkstra = BidirectionalDijkstra::new(&store, weighting.as_ref(), &no_filters, 1_000);
        let SearchResult::Found { edges, .. } = dijkstra.calc_path(0, 5) else {
            panic!("expected a path");
        };
        assert!(edges.iter().any(|(edge_id, _)| *edge_id == border_edge));
    }
}
