use std::fmt;

use tracing::{debug, info, warn};

use crate::{
    ch::core_graph::CoreGraph,
    distance::{Distance, Meters},
    edge_direction::EdgeDirection,
    error::{LegFailure, RequestError, RouteError},
    filters::EdgeFilterChain,
    graph::{Graph, GraphEdge, GraphStore},
    landmarks::lm_data::LandmarkSet,
    stopwatch::Stopwatch,
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight, Weighting},
};

use super::{
    bidirectional_dijkstra::BidirectionalDijkstra,
    calculator_state::{CalculatorState, CalculatorStateMachine},
    core_search::CoreSearch,
    routing_path::{RoutingPath, RoutingPathLeg},
    shortest_path_algorithm::{SearchResult, ShortestPathAlgorithm},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// Core search with landmark potentials inside the core
    CoreAlt,
    /// Core search without potentials
    CoreDijkstra,
    /// Search over the uncontracted store
    BidirectionalDijkstra,
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmKind::CoreAlt => "core_alt",
            AlgorithmKind::CoreDijkstra => "core_dijkstra",
            AlgorithmKind::BidirectionalDijkstra => "bidirectional_dijkstra",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub disable_core: bool,
    pub disable_landmarks: bool,
    pub max_visited_nodes: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            disable_core: false,
            disable_landmarks: false,
            max_visited_nodes: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    PathFound(RoutingPathLeg),
    NoPath,
    AbortedMaxNodes { visited_nodes: usize },
}

/// Computes the legs of a route for one weighting and filter chain.
pub struct PathCalculator<'a> {
    store: &'a GraphStore,
    weighting: &'a dyn Weighting,
    filters: &'a EdgeFilterChain,
    options: SearchOptions,
    core_graph: Option<&'a CoreGraph>,
    landmarks: Option<&'a LandmarkSet>,

    algorithm: AlgorithmKind,
    state: CalculatorStateMachine,
}

impl<'a> PathCalculator<'a> {
    pub fn new(
        store: &'a GraphStore,
        weighting: &'a dyn Weighting,
        filters: &'a EdgeFilterChain,
        options: SearchOptions,
    ) -> Self {
        let core_graph = store.core_graph(weighting.name());
        let landmarks = core_graph.and_then(|core_graph| store.landmarks(core_graph.weighting_name()));

        PathCalculator {
            store,
            weighting,
            filters,
            options,
            core_graph,
            landmarks,
            algorithm: AlgorithmKind::BidirectionalDijkstra,
            state: CalculatorStateMachine::new(),
        }
    }

    /// Algorithm of the last search.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    pub fn state(&self) -> CalculatorState {
        self.state.state()
    }

    pub fn history(&self) -> &[CalculatorState] {
        self.state.history()
    }

    pub fn select_algorithm(&self) -> AlgorithmKind {
        if self.options.disable_core {
            return AlgorithmKind::BidirectionalDijkstra;
        }

        let Some(core_graph) = self.core_graph else {
            return AlgorithmKind::BidirectionalDijkstra;
        };

        if !self.filters.covered_by(core_graph.restrictions()) {
            debug!(
                filters = ?self.filters,
                weighting = self.weighting.name(),
                "Filters not covered by the core restrictions"
            );
            return AlgorithmKind::BidirectionalDijkstra;
        }

        if self.options.disable_landmarks {
            return AlgorithmKind::CoreDijkstra;
        }

        match self.landmarks {
            Some(landmarks) if landmarks.landmark_count() == 0 => AlgorithmKind::CoreDijkstra,
            Some(landmarks)
                if landmarks.weighting_name() != core_graph.weighting_name()
                    || landmarks.node_count() != core_graph.node_count() =>
            {
                warn!(
                    core = core_graph.weighting_name(),
                    landmarks = landmarks.weighting_name(),
                    "Landmarks do not match the core graph, ignoring them"
                );
                AlgorithmKind::CoreDijkstra
            }
            Some(_) => AlgorithmKind::CoreAlt,
            None => AlgorithmKind::CoreDijkstra,
        }
    }

    /// Core graph used by the current algorithm.
    fn active_core_graph(&self) -> Option<&'a CoreGraph> {
        match self.algorithm {
            AlgorithmKind::BidirectionalDijkstra => None,
            AlgorithmKind::CoreAlt | AlgorithmKind::CoreDijkstra => self.core_graph,
        }
    }

    fn search(&self, start: NodeId, end: NodeId) -> SearchResult {
        match self.active_core_graph() {
            Some(core_graph) => {
                let landmarks = self
                    .landmarks
                    .filter(|_| self.algorithm == AlgorithmKind::CoreAlt);
                CoreSearch::new(
                    self.store,
                    core_graph,
                    self.filters,
                    landmarks,
                    self.options.max_visited_nodes,
                )
                .calc_path(start, end)
            }
            None => BidirectionalDijkstra::new(
                self.store,
                self.weighting,
                self.filters,
                self.options.max_visited_nodes,
            )
            .calc_path(start, end),
        }
    }

    pub fn calc_leg(&mut self, start: NodeId, end: NodeId) -> Result<SearchOutcome, RouteError> {
        if self.state.state() == CalculatorState::Done {
            self.state.transition(CalculatorState::Init)?;
        }

        self.algorithm = self.select_algorithm();
        self.state.transition(CalculatorState::AlgorithmSelected)?;
        debug!(algorithm = %self.algorithm, start, end, "Selected algorithm");

        loop {
            self.state.transition(CalculatorState::Searching)?;

            let mut stopwatch = Stopwatch::new(format!("search/{}", self.algorithm));
            stopwatch.start();
            let result = self.search(start, end);
            stopwatch.stop();
            stopwatch.report();

            match result {
                SearchResult::NoPath { visited_nodes } => {
                    debug!(visited_nodes, "No path found");
                    self.state.transition(CalculatorState::NoPath)?;
                    self.state.transition(CalculatorState::Done)?;
                    return Ok(SearchOutcome::NoPath);
                }
                SearchResult::Aborted { visited_nodes } => {
                    info!(
                        algorithm = %self.algorithm,
                        visited_nodes,
                        "Search aborted, too many visited nodes"
                    );
                    self.state.transition(CalculatorState::AbortedMaxNodes)?;
                    self.state.transition(CalculatorState::Done)?;
                    return Ok(SearchOutcome::AbortedMaxNodes { visited_nodes });
                }
                SearchResult::Found {
                    edges, visited_nodes, ..
                } => {
                    debug!(visited_nodes, edges = edges.len(), "Path found");
                    self.state.transition(CalculatorState::PathFound)?;
                    self.state.transition(CalculatorState::Unpacking)?;

                    match self.unpack(start, &edges) {
                        Ok(leg) => {
                            self.state.transition(CalculatorState::Done)?;
                            return Ok(SearchOutcome::PathFound(leg));
                        }
                        Err(edge_id) if self.algorithm != AlgorithmKind::BidirectionalDijkstra => {
                            warn!(
                                edge_id,
                                algorithm = %self.algorithm,
                                "Unpacked edge rejected by the filters, searching again without core"
                            );
                            self.algorithm = AlgorithmKind::BidirectionalDijkstra;
                        }
                        Err(edge_id) => {
                            warn!(edge_id, "Unpacked edge rejected by the filters");
                            self.state.transition(CalculatorState::NoPath)?;
                            self.state.transition(CalculatorState::Done)?;
                            return Ok(SearchOutcome::NoPath);
                        }
                    }
                }
            }
        }
    }

    /// Expands the search edges into original edges and builds the leg.
    /// Fails with the first original edge the filters reject.
    fn unpack(&self, start: NodeId, edges: &[(EdgeId, NodeId)]) -> Result<RoutingPathLeg, EdgeId> {
        let mut original_edges: Vec<(EdgeId, EdgeDirection)> = Vec::with_capacity(edges.len());

        match self.active_core_graph() {
            Some(core_graph) => {
                for &(edge_id, from) in edges {
                    core_graph.unfold_edge(edge_id, from, &mut original_edges);
                }
            }
            None => original_edges.extend(
                edges
                    .iter()
                    .map(|&(edge_id, from)| (edge_id, self.store.edge_direction(edge_id, from))),
            ),
        }

        let mut distance: Distance<Meters> = Distance::default();
        let mut time: Milliseconds = 0;
        let mut weight: Weight = 0;
        let mut points = vec![*self.store.node_geometry(start)];

        for &(edge_id, direction) in &original_edges {
            let edge = self.store.edge(edge_id);
            if !self.filters.accept(self.store, edge, direction) {
                return Err(edge_id);
            }

            distance = distance + edge.distance();
            time = time.saturating_add(self.weighting.calc_edge_ms(edge, direction));
            weight = weight.saturating_add(self.weighting.calc_edge_weight(edge, direction));

            // The first point of every edge is the last point of the previous one
            match direction {
                EdgeDirection::Forward => points.extend(edge.geometry().iter().skip(1)),
                EdgeDirection::Backward => points.extend(edge.geometry().iter().rev().skip(1)),
            }
        }

        Ok(RoutingPathLeg::new(distance, time, weight, original_edges, points))
    }

    /// Routes through every waypoint in order, each consecutive pair is a leg.
    pub fn calc_path(&mut self, waypoints: &[NodeId]) -> Result<RoutingPath, RouteError> {
        if waypoints.len() < 2 {
            return Err(RequestError::TooFewWaypoints(waypoints.len()).into());
        }

        let mut legs = Vec::with_capacity(waypoints.len() - 1);
        for (leg, pair) in waypoints.windows(2).enumerate() {
            match self.calc_leg(pair[0], pair[1])? {
                SearchOutcome::PathFound(path_leg) => legs.push(path_leg),
                SearchOutcome::NoPath => {
                    return Err(RouteError::LegFailed {
                        leg,
                        failure: LegFailure::NoPath,
                    });
                }
                SearchOutcome::AbortedMaxNodes { visited_nodes } => {
                    return Err(RouteError::LegFailed {
                        leg,
                        failure: LegFailure::AbortedMaxNodes { visited_nodes },
                    });
                }
            }
        }

        Ok(RoutingPath::new(legs))
    }
}
