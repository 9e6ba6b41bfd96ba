use fxhash::FxHashSet;
use tracing::trace;

use crate::{
    ch::core_graph::{CoreGraph, CoreGraphEdge},
    constants::{INVALID_EDGE, INVALID_NODE, MAX_WEIGHT},
    filters::EdgeFilterChain,
    graph::{Graph, GraphEdge, GraphStore},
    landmarks::{lm_data::LandmarkSet, lm_heuristic::LandmarkHeuristic},
    types::{EdgeId, NodeId},
    weighting::Weight,
};

use super::{
    astar_heuristic::{AStarHeuristic, ZeroHeuristic},
    search_direction::SearchDirection,
    search_space::SearchSpace,
    shortest_path_algorithm::{SearchResult, ShortestPathAlgorithm},
};

/// The search went over the visited nodes ceiling.
struct Aborted;

/// Shortest path search over a core graph.
///
/// The first phase is a bidirectional upward search over the contracted
/// nodes. Core nodes it reaches are labelled but not expanded, they become
/// the entry nodes of the second phase, a bidirectional A* inside the core
/// following "Yet another bidirectional algorithm for shortest paths" by
/// Wim Pijls and Henk Post (https://repub.eur.nl/pub/16100/ei2009-10.pdf).
///
/// With landmarks, the potential of a core node is its landmark bound to
/// the closest entry node of the other side plus the label of that entry.
/// Without landmarks the second phase is a bidirectional Dijkstra.
///
/// Only original edges inside the core go through the filter chain.
pub(crate) struct CoreSearch<'a> {
    store: &'a GraphStore,
    core_graph: &'a CoreGraph,
    filters: &'a EdgeFilterChain,
    landmarks: Option<&'a LandmarkSet>,
    max_visited_nodes: usize,

    forward: SearchSpace,
    backward: SearchSpace,
    forward_entries: Vec<NodeId>,
    backward_entries: Vec<NodeId>,
    /// Core nodes expanded by either direction
    closed: FxHashSet<NodeId>,

    best_meeting_node: NodeId,
    best_path_weight: Weight,
    visited_nodes: usize,
}

impl<'a> CoreSearch<'a> {
    pub fn new(
        store: &'a GraphStore,
        core_graph: &'a CoreGraph,
        filters: &'a EdgeFilterChain,
        landmarks: Option<&'a LandmarkSet>,
        max_visited_nodes: usize,
    ) -> Self {
        CoreSearch {
            store,
            core_graph,
            filters,
            landmarks,
            max_visited_nodes,
            forward: SearchSpace::new(),
            backward: SearchSpace::new(),
            forward_entries: Vec::new(),
            backward_entries: Vec::new(),
            closed: FxHashSet::default(),
            best_meeting_node: INVALID_NODE,
            best_path_weight: MAX_WEIGHT,
            visited_nodes: 0,
        }
    }

    fn init(&mut self, start: NodeId, end: NodeId) {
        self.forward.init(start);
        self.backward.init(end);
        self.forward_entries.clear();
        self.backward_entries.clear();
        self.closed.clear();

        if self.core_graph.is_core(start) {
            self.forward_entries.push(start);
        } else {
            self.forward.push(start, 0, 0);
        }

        if self.core_graph.is_core(end) {
            self.backward_entries.push(end);
        } else {
            self.backward.push(end, 0, 0);
        }

        self.best_meeting_node = INVALID_NODE;
        self.best_path_weight = MAX_WEIGHT;
        self.visited_nodes = 0;
    }

    fn visit(&mut self) -> Result<(), Aborted> {
        if self.visited_nodes >= self.max_visited_nodes {
            trace!(visited_nodes = self.visited_nodes, "Core search aborted");
            return Err(Aborted);
        }

        self.visited_nodes += 1;
        Ok(())
    }

    fn update_best_path(&mut self, node: NodeId) {
        let forward_weight = self.forward.weight(node);
        let backward_weight = self.backward.weight(node);
        if forward_weight == MAX_WEIGHT || backward_weight == MAX_WEIGHT {
            return;
        }

        let total_weight = forward_weight.saturating_add(backward_weight);
        if total_weight < self.best_path_weight {
            self.best_path_weight = total_weight;
            self.best_meeting_node = node;
        }
    }

    fn upward_search(&mut self) -> Result<(), Aborted> {
        loop {
            let forward_min = self
                .forward
                .min_key()
                .filter(|weight| *weight < self.best_path_weight);
            let backward_min = self
                .backward
                .min_key()
                .filter(|weight| *weight < self.best_path_weight);

            let dir = match (forward_min, backward_min) {
                (None, None) => return Ok(()),
                (Some(forward_min), Some(backward_min)) if backward_min < forward_min => {
                    SearchDirection::Backward
                }
                (Some(_), _) => SearchDirection::Forward,
                (None, Some(_)) => SearchDirection::Backward,
            };

            let space = match dir {
                SearchDirection::Forward => &mut self.forward,
                SearchDirection::Backward => &mut self.backward,
            };

            let Some(item) = space.pop() else {
                continue;
            };

            if !space.is_current(&item) {
                continue;
            }

            self.visit()?;
            self.process_upward_node(dir, item.node_id, item.g_score);
        }
    }

    fn process_upward_node(&mut self, dir: SearchDirection, node: NodeId, weight: Weight) {
        let edges = match dir {
            SearchDirection::Forward => self.core_graph.upward_outgoing(node),
            SearchDirection::Backward => self.core_graph.upward_incoming(node),
        };

        for &edge_id in edges {
            let Some(edge) = self.core_graph.edge(edge_id) else {
                continue;
            };
            let adj_node = edge.adj_node(node);

            let edge_weight = match dir {
                SearchDirection::Forward => edge.weight_from(node),
                SearchDirection::Backward => edge.weight_from(adj_node),
            };
            if edge_weight == MAX_WEIGHT {
                continue;
            }

            let is_core = self.core_graph.is_core(adj_node);
            let (space, entries) = match dir {
                SearchDirection::Forward => (&mut self.forward, &mut self.forward_entries),
                SearchDirection::Backward => (&mut self.backward, &mut self.backward_entries),
            };

            let current_weight = space.weight(adj_node);
            let next_weight = weight.saturating_add(edge_weight);
            if next_weight < current_weight {
                space.update(adj_node, next_weight, node, edge_id);
                if !is_core {
                    space.push(adj_node, next_weight, next_weight);
                } else if current_weight == MAX_WEIGHT {
                    entries.push(adj_node);
                }
            }

            self.update_best_path(adj_node);
        }

        match dir {
            SearchDirection::Forward => self.forward.settle(node),
            SearchDirection::Backward => self.backward.settle(node),
        }
    }

    fn core_search(
        &mut self,
        forward_heuristic: &mut impl AStarHeuristic,
        backward_heuristic: &mut impl AStarHeuristic,
    ) -> Result<(), Aborted> {
        self.forward.clear_heap();
        self.backward.clear_heap();

        for &node in &self.forward_entries {
            let weight = self.forward.weight(node);
            let potential = forward_heuristic.potential(node);
            self.forward.push(node, weight, weight.saturating_add(potential));
        }

        for &node in &self.backward_entries {
            let weight = self.backward.weight(node);
            let potential = backward_heuristic.potential(node);
            self.backward.push(node, weight, weight.saturating_add(potential));
        }

        loop {
            // The search ends as soon as one open set is empty or can only
            // hold rejected nodes
            let (Some(forward_min), Some(backward_min)) =
                (self.forward.min_key(), self.backward.min_key())
            else {
                return Ok(());
            };
            if forward_min >= self.best_path_weight || backward_min >= self.best_path_weight {
                return Ok(());
            }

            let dir = if self.forward.open_len() <= self.backward.open_len() {
                SearchDirection::Forward
            } else {
                SearchDirection::Backward
            };

            let (item, opposite_min, opposite_potential) = match dir {
                SearchDirection::Forward => {
                    let Some(item) = self.forward.pop() else {
                        continue;
                    };
                    (item, backward_min, backward_heuristic.potential(item.node_id))
                }
                SearchDirection::Backward => {
                    let Some(item) = self.backward.pop() else {
                        continue;
                    };
                    (item, forward_min, forward_heuristic.potential(item.node_id))
                }
            };

            let node = item.node_id;
            let space = match dir {
                SearchDirection::Forward => &self.forward,
                SearchDirection::Backward => &self.backward,
            };
            if self.closed.contains(&node) || item.g_score > space.weight(node) {
                continue;
            }
            self.closed.insert(node);

            // Rejected nodes are closed without being expanded
            let reduced_weight =
                item.g_score as i64 + opposite_min as i64 - opposite_potential as i64;
            if item.f_score >= self.best_path_weight
                || reduced_weight >= self.best_path_weight as i64
            {
                continue;
            }

            self.visit()?;

            match dir {
                SearchDirection::Forward => {
                    self.process_core_node(dir, node, item.g_score, forward_heuristic)
                }
                SearchDirection::Backward => {
                    self.process_core_node(dir, node, item.g_score, backward_heuristic)
                }
            }
        }
    }

    fn process_core_node(
        &mut self,
        dir: SearchDirection,
        node: NodeId,
        weight: Weight,
        heuristic: &mut impl AStarHeuristic,
    ) {
        let edges = match dir {
            SearchDirection::Forward => self.core_graph.core_outgoing(node),
            SearchDirection::Backward => self.core_graph.core_incoming(node),
        };

        for &edge_id in edges {
            let Some(edge) = self.core_graph.edge(edge_id) else {
                continue;
            };
            let adj_node = edge.adj_node(node);

            if self.closed.contains(&adj_node) {
                continue;
            }

            // Node the edge is traversed from
            let tail = match dir {
                SearchDirection::Forward => node,
                SearchDirection::Backward => adj_node,
            };

            let edge_weight = edge.weight_from(tail);
            if edge_weight == MAX_WEIGHT || !self.accept_core_edge(edge, tail) {
                continue;
            }

            let space = match dir {
                SearchDirection::Forward => &mut self.forward,
                SearchDirection::Backward => &mut self.backward,
            };

            let next_weight = weight.saturating_add(edge_weight);
            if next_weight < space.weight(adj_node) {
                space.update(adj_node, next_weight, node, edge_id);
                let potential = heuristic.potential(adj_node);
                space.push(adj_node, next_weight, next_weight.saturating_add(potential));
                self.update_best_path(adj_node);
            }
        }

        match dir {
            SearchDirection::Forward => self.forward.settle(node),
            SearchDirection::Backward => self.backward.settle(node),
        }
    }

    fn accept_core_edge(&self, edge: &CoreGraphEdge, tail: NodeId) -> bool {
        match edge {
            CoreGraphEdge::Edge(base_edge) => self.filters.accept(
                self.store,
                self.store.edge(base_edge.id),
                base_edge.direction_from(tail),
            ),
            // Shortcuts only hide edges no filter of a covered chain inspects
            CoreGraphEdge::Shortcut(_) => true,
        }
    }

    fn run(&mut self) -> Result<(), Aborted> {
        self.upward_search()?;

        if self.forward_entries.is_empty() || self.backward_entries.is_empty() {
            return Ok(());
        }

        trace!(
            forward_entries = self.forward_entries.len(),
            backward_entries = self.backward_entries.len(),
            "Core entered"
        );

        match self.landmarks {
            Some(landmarks) => {
                let mut forward_heuristic = LandmarkHeuristic::new(
                    landmarks,
                    self.entry_weights(SearchDirection::Backward),
                    SearchDirection::Forward,
                );
                let mut backward_heuristic = LandmarkHeuristic::new(
                    landmarks,
                    self.entry_weights(SearchDirection::Forward),
                    SearchDirection::Backward,
                );
                self.core_search(&mut forward_heuristic, &mut backward_heuristic)
            }
            None => self.core_search(&mut ZeroHeuristic, &mut ZeroHeuristic),
        }
    }

    fn entry_weights(&self, dir: SearchDirection) -> Vec<(NodeId, Weight)> {
        let (entries, space) = match dir {
            SearchDirection::Forward => (&self.forward_entries, &self.forward),
            SearchDirection::Backward => (&self.backward_entries, &self.backward),
        };

        entries.iter().map(|&node| (node, space.weight(node))).collect()
    }

    fn path_edges(&self) -> Vec<(EdgeId, NodeId)> {
        let mut edges = self.forward.path_from_root(self.best_meeting_node);
        edges.extend(self.backward.path_to_root(self.best_meeting_node));
        debug_assert!(edges.iter().all(|(edge_id, _)| *edge_id != INVALID_EDGE));
        edges
    }
}

impl ShortestPathAlgorithm for CoreSearch<'_> {
    fn calc_path(&mut self, start: NodeId, end: NodeId) -> SearchResult {
        if start == end {
            return SearchResult::Found {
                weight: 0,
                edges: Vec::new(),
                visited_nodes: 0,
            };
        }

        self.init(start, end);

        if self.run().is_err() {
            return SearchResult::Aborted {
                visited_nodes: self.visited_nodes,
            };
        }

        if self.best_meeting_node == INVALID_NODE {
            return SearchResult::NoPath {
                visited_nodes: self.visited_nodes,
            };
        }

        SearchResult::Found {
            weight: self.best_path_weight,
            edges: self.path_edges(),
            visited_nodes: self.visited_nodes,
        }
    }
}
