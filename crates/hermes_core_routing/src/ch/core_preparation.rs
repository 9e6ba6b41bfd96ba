use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    config::CorePreparationConfig,
    constants::{INVALID_EDGE, RESTRICTION_PRIORITY},
    error::ConfigurationError,
    graph::{Graph, GraphEdge, GraphStore},
    stopwatch::Stopwatch,
    types::NodeId,
    weighting::Weighting,
};

use super::{
    core_graph::{CoreBaseEdge, CoreGraph, CoreGraphEdge},
    core_restrictions::CoreRestrictions,
    preparation_graph::{PreparationEdgeKind, PreparationGraph},
    priority_queue::ContractionQueue,
    shortcut::Shortcut,
    witness_search::WitnessSearch,
};

/// Contracts every node of the store except the core nodes selected by the
/// restrictions, for one weighting.
pub struct CorePreparation<'a> {
    store: &'a GraphStore,
    weighting: &'a dyn Weighting,
    restrictions: CoreRestrictions,
    config: CorePreparationConfig,
    core_nodes: Vec<bool>,

    build_stopwatch: Stopwatch,
    recompute_priority_stopwatch: Stopwatch,
    recompute_neighbors_priority_stopwatch: Stopwatch,
    contract_node_stopwatch: Stopwatch,
    contracted_nodes: usize,
    skipped_nodes: usize,
    added_shortcuts: usize,
}

impl<'a> CorePreparation<'a> {
    pub fn new(
        store: &'a GraphStore,
        weighting: &'a dyn Weighting,
        restrictions: CoreRestrictions,
        config: CorePreparationConfig,
    ) -> Result<Self, ConfigurationError> {
        if !store.is_frozen() {
            return Err(ConfigurationError::StoreNotFrozen("core preparation"));
        }

        let core_nodes = restrictions.core_nodes(store, weighting);

        Ok(CorePreparation {
            store,
            weighting,
            restrictions,
            config,
            core_nodes,
            build_stopwatch: Stopwatch::new("build_core_graph"),
            recompute_priority_stopwatch: Stopwatch::new("recompute_priority"),
            recompute_neighbors_priority_stopwatch: Stopwatch::new("recompute_neighbors_priority"),
            contract_node_stopwatch: Stopwatch::new("contract_node"),
            contracted_nodes: 0,
            skipped_nodes: 0,
            added_shortcuts: 0,
        })
    }

    /// Uses an explicit core instead of the one derived from the restrictions.
    pub fn with_core_nodes(mut self, core_nodes: Vec<bool>) -> Self {
        debug_assert_eq!(core_nodes.len(), self.store.node_count());
        self.core_nodes = core_nodes;
        self
    }

    pub fn prepare(mut self) -> CoreGraph {
        self.build_stopwatch.start();
        let mut last_reported_time = Instant::now();

        let mut graph = PreparationGraph::new(self.store, self.weighting, &self.restrictions);
        let node_count = graph.node_count();
        let core_node_count = self.core_nodes.iter().filter(|is_core| **is_core).count();

        let mut contracted_neighbors = vec![0; node_count];
        let mut shortcuts: Vec<Shortcut> = Vec::new();
        let mut witness_search = WitnessSearch::new();
        let mut queue = ContractionQueue::new(node_count);
        let mut ranks = vec![usize::MAX; node_count];

        info!(
            weighting = self.weighting.name(),
            node_count,
            edge_count = self.store.edge_count(),
            core_node_count,
            "Start core contraction"
        );

        let priorities: Vec<i32> = (0..node_count)
            .into_par_iter()
            .map_init(WitnessSearch::new, |witness_search, node| {
                self.calc_priority(&graph, witness_search, &contracted_neighbors, node)
            })
            .collect();

        for (node, priority) in priorities.into_iter().enumerate() {
            queue
                .insert(node, priority)
                .unwrap_or_else(|err| unreachable!("node {node} queued twice: {err}"));
        }

        debug!("Finish computing priority for every node");

        let periodic_interval = match self.config.periodic_updates {
            0 => 0,
            percentage => ((node_count - core_node_count) * percentage / 100).max(1),
        };
        let mut rank = 0;

        while let Some((node, priority)) = queue.head() {
            // Only core nodes are left
            if priority == RESTRICTION_PRIORITY {
                break;
            }
            queue.pop();

            // Lazy recomputation of the priority, the node is queued again
            // when it is no longer the best candidate
            if self.config.lazy_updates
                && priority != i32::MIN
                && let Some((_, least_priority)) = queue.head()
            {
                self.recompute_priority_stopwatch.start();
                let recomputed_priority =
                    self.calc_priority(&graph, &mut witness_search, &contracted_neighbors, node);
                self.recompute_priority_stopwatch.stop();

                if recomputed_priority > least_priority {
                    queue
                        .insert(node, recomputed_priority)
                        .unwrap_or_else(|err| unreachable!("node {node} queued twice: {err}"));
                    continue;
                }
            }

            ranks[node] = rank;
            rank += 1;

            if graph.node_degree(node) == 0 {
                self.skipped_nodes += 1;
                continue;
            }

            let neighbors = graph.neighbors(node);
            self.contract_node(&mut graph, &mut witness_search, &mut shortcuts, node);
            self.contracted_nodes += 1;

            for &neighbor in neighbors.iter() {
                contracted_neighbors[neighbor] += 1;
            }

            if periodic_interval > 0 && self.contracted_nodes.is_multiple_of(periodic_interval) {
                debug!("Recompute all remaining priorities");
                self.recompute_priority_stopwatch.start();
                let remaining_nodes = queue.drain();

                let recomputed: Vec<(NodeId, i32)> = remaining_nodes
                    .into_par_iter()
                    .map_init(WitnessSearch::new, |witness_search, node| {
                        let priority =
                            self.calc_priority(&graph, witness_search, &contracted_neighbors, node);
                        (node, priority)
                    })
                    .collect();

                for (node, priority) in recomputed {
                    queue
                        .insert(node, priority)
                        .unwrap_or_else(|err| unreachable!("node {node} queued twice: {err}"));
                }
                self.recompute_priority_stopwatch.stop();
            } else {
                self.recompute_neighbors_priority_stopwatch.start();
                for &neighbor in neighbors
                    .iter()
                    .filter(|&&neighbor| !self.core_nodes[neighbor])
                    .take(self.config.neighbor_updates)
                {
                    let recomputed_neighbor_priority = self.calc_priority(
                        &graph,
                        &mut witness_search,
                        &contracted_neighbors,
                        neighbor,
                    );
                    queue.change_priority(neighbor, recomputed_neighbor_priority);
                }
                self.recompute_neighbors_priority_stopwatch.stop();
            }

            if last_reported_time.elapsed().as_millis() > 3000 {
                self.report_timings(&graph);
                last_reported_time = Instant::now();
            }
        }

        // The core sits at the highest level
        for node in queue.drain() {
            ranks[node] = rank;
            rank += 1;
        }

        self.build_stopwatch.stop();
        self.report_timings(&graph);
        info!(
            weighting = self.weighting.name(),
            "Added {} shortcuts for {} base edges in {}ms",
            self.added_shortcuts,
            self.store.edge_count(),
            self.build_stopwatch.total_duration().as_millis()
        );

        let edges = (0..graph.base_edge_count())
            .map(|edge_id| {
                if !graph.is_accessible(edge_id) {
                    return None;
                }

                let edge = graph.edge(edge_id);
                debug_assert_eq!(edge.kind, PreparationEdgeKind::Base);
                Some(CoreGraphEdge::Edge(CoreBaseEdge {
                    id: edge_id,
                    start: edge.start,
                    end: edge.end,
                    distance: edge.distance,
                    forward_weight: edge.forward_weight,
                    backward_weight: edge.backward_weight,
                    forward_time: edge.forward_time,
                    backward_time: edge.backward_time,
                }))
            })
            .chain(shortcuts.into_iter().map(|shortcut| Some(CoreGraphEdge::Shortcut(shortcut))))
            .collect();

        let core_graph = CoreGraph::new(
            self.weighting.name().to_string(),
            self.restrictions,
            edges,
            ranks,
            self.core_nodes,
        );

        if !core_graph.check() {
            warn!(
                weighting = core_graph.weighting_name(),
                "Core graph has inconsistent shortcuts"
            );
        }

        core_graph
    }

    fn report_timings(&self, graph: &PreparationGraph) {
        let current_duration = self.build_stopwatch.elapsed();
        let contract_node_duration = self.contract_node_stopwatch.total_duration();
        let recompute_priority_duration = self.recompute_priority_stopwatch.total_duration();
        let recompute_neighbors_duration =
            self.recompute_neighbors_priority_stopwatch.total_duration();

        info!(
            total = format!("{}ms", current_duration.as_millis()),
            contract = Self::format_percentage(&current_duration, &contract_node_duration),
            recompute_priority =
                Self::format_percentage(&current_duration, &recompute_priority_duration),
            recompute_neighbors_priority =
                Self::format_percentage(&current_duration, &recompute_neighbors_duration),
            contracted_nodes = self.contracted_nodes,
            skipped_nodes = self.skipped_nodes,
            shortcuts = self.added_shortcuts,
            mean_degree = format!("{:.2}", graph.mean_degree()),
            "Core contraction progress"
        );
    }

    fn format_percentage(total: &Duration, duration: &Duration) -> String {
        if total.is_zero() {
            return String::from("0.00%");
        }

        let percentage = duration.as_secs_f64() / total.as_secs_f64() * 100.0;
        format!("{percentage:.2}%")
    }

    fn contract_node(
        &mut self,
        graph: &mut PreparationGraph,
        witness_search: &mut WitnessSearch,
        shortcuts: &mut Vec<Shortcut>,
        node: NodeId,
    ) {
        self.contract_node_stopwatch.start();

        let found = Self::find_shortcuts(
            graph,
            witness_search,
            node,
            self.config.witness_settled_nodes,
        );

        for mut shortcut in found {
            shortcut.id = graph.next_edge_id();
            graph.add_shortcut(&shortcut);
            shortcuts.push(shortcut);
            self.added_shortcuts += 1;
        }

        graph.disconnect_node(node);

        self.contract_node_stopwatch.stop();
    }

    /// `10 * edge_difference + original_edges + contracted_neighbors`, core
    /// nodes are pinned at `RESTRICTION_PRIORITY` and isolated nodes go first.
    fn calc_priority(
        &self,
        graph: &PreparationGraph,
        witness_search: &mut WitnessSearch,
        contracted_neighbors: &[usize],
        node: NodeId,
    ) -> i32 {
        if self.core_nodes[node] {
            return RESTRICTION_PRIORITY;
        }

        let degree = graph.node_degree(node);

        // Isolated node
        if degree == 0 {
            return i32::MIN;
        }

        let shortcuts = Self::find_shortcuts(
            graph,
            witness_search,
            node,
            self.config.priority_witness_settled_nodes,
        );

        let original_edges: usize = shortcuts.iter().map(|shortcut| shortcut.original_edges).sum();
        let edge_difference = shortcuts.len() as i64 - degree as i64;
        let priority =
            10 * edge_difference + original_edges as i64 + contracted_neighbors[node] as i64;

        priority.clamp(i32::MIN as i64 + 1, RESTRICTION_PRIORITY as i64 - 1) as i32
    }

    /// Shortcuts needed to remove `node`, without ids. Parallel candidates
    /// between the same pair of nodes are reduced to the lightest.
    fn find_shortcuts(
        graph: &PreparationGraph,
        witness_search: &mut WitnessSearch,
        node: NodeId,
        max_settled_nodes: usize,
    ) -> Vec<Shortcut> {
        let mut shortcuts = Vec::new();

        for &incoming_edge_id in graph.incoming_edges(node) {
            let incoming_edge = graph.edge(incoming_edge_id);
            let from_node = incoming_edge.adj_node(node);

            if from_node == node {
                continue;
            }

            let incoming_weight = incoming_edge.weight_from(from_node);
            witness_search.init(from_node, node);

            for &outgoing_edge_id in graph.outgoing_edges(node) {
                // We ignore the same edge, no shortcut is needed
                if incoming_edge_id == outgoing_edge_id {
                    continue;
                }

                let outgoing_edge = graph.edge(outgoing_edge_id);
                let to_node = outgoing_edge.adj_node(node);

                if to_node == from_node || to_node == node {
                    continue;
                }

                let weight = incoming_weight.saturating_add(outgoing_edge.weight_from(node));

                let witness_weight = witness_search.compute_weight_upperbound(
                    graph,
                    to_node,
                    weight,
                    max_settled_nodes,
                );

                if witness_weight <= weight {
                    continue;
                }

                shortcuts.push(Shortcut {
                    id: INVALID_EDGE,
                    start: from_node,
                    end: to_node,
                    incoming_edge: incoming_edge_id,
                    outgoing_edge: outgoing_edge_id,
                    distance: incoming_edge.distance + outgoing_edge.distance,
                    time: incoming_edge
                        .time_from(from_node)
                        .saturating_add(outgoing_edge.time_from(node)),
                    weight,
                    original_edges: incoming_edge.original_edges + outgoing_edge.original_edges,
                });
            }
        }

        shortcuts.sort_by_key(|shortcut| (shortcut.start, shortcut.end, shortcut.weight));
        shortcuts.dedup_by_key(|shortcut| (shortcut.start, shortcut.end));

        shortcuts
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        distance::meters,
        edge_direction::EdgeDirection,
        geopoint::GeoPoint,
        graph::{EdgeRecord, attributes::EdgeAttributes},
        test_graph_utils::test_graph::{
            RomaniaGraphCity, car_flags, car_weighting, line_graph, romania_graph,
            romania_graph_with_attributes,
        },
    };

    use super::*;

    fn prepare(store: &GraphStore, core_nodes: Option<Vec<bool>>) -> CoreGraph {
        let weighting = car_weighting(store);
        let preparation = CorePreparation::new(
            store,
            weighting.as_ref(),
            CoreRestrictions::all(),
            CorePreparationConfig::default(),
        )
        .unwrap();

        match core_nodes {
            Some(core_nodes) => preparation.with_core_nodes(core_nodes).prepare(),
            None => preparation.prepare(),
        }
    }

    #[test]
    fn should_require_frozen_store() {
        let store = GraphStore::new(["car"]);
        let weighting = car_weighting(&store);

        assert!(matches!(
            CorePreparation::new(
                &store,
                weighting.as_ref(),
                CoreRestrictions::none(),
                CorePreparationConfig::default()
            ),
            Err(ConfigurationError::StoreNotFrozen(_))
        ));
    }

    #[test]
    fn shortcut_should_sum_and_unfold_its_parts() {
        let store = line_graph(3);
        let core_graph = prepare(&store, Some(vec![true, false, true]));

        assert_eq!(core_graph.shortcut_count(), 2);
        assert!(core_graph.check());

        let shortcut = core_graph.shortcuts().find(|shortcut| shortcut.start == 0).unwrap();
        assert_eq!(shortcut.end, 2);

        let first = core_graph.edge(0).unwrap();
        let second = core_graph.edge(1).unwrap();
        assert_eq!(
            shortcut.weight,
            first.weight_from(0) + second.weight_from(1)
        );
        assert_eq!(shortcut.time, first.time_from(0) + second.time_from(1));
        assert_eq!(shortcut.distance, first.distance() + second.distance());
        assert_eq!(shortcut.original_edges, 2);

        let mut unfolded = Vec::new();
        core_graph.unfold_edge(shortcut.id, 0, &mut unfolded);
        assert_eq!(
            unfolded,
            vec![(0, EdgeDirection::Forward), (1, EdgeDirection::Forward)]
        );

        let backward = core_graph.shortcuts().find(|shortcut| shortcut.start == 2).unwrap();
        unfolded.clear();
        core_graph.unfold_edge(backward.id, 2, &mut unfolded);
        assert_eq!(
            unfolded,
            vec![(1, EdgeDirection::Backward), (0, EdgeDirection::Backward)]
        );
    }

    #[test]
    fn core_nodes_should_never_be_contracted() {
        let store = line_graph(3);
        let core_graph = prepare(&store, Some(vec![true, false, true]));

        assert_eq!(core_graph.rank(1), 0);
        assert_eq!(core_graph.core_level(), 1);
        assert!(core_graph.is_core(0) && core_graph.is_core(2));
        assert!(core_graph.rank(0) >= core_graph.core_level());

        // Core nodes reach each other through the shortcuts only
        assert_eq!(core_graph.core_outgoing(0).len(), 1);
        assert_eq!(core_graph.core_incoming(0).len(), 1);
        assert_eq!(core_graph.upward_outgoing(1).len(), 2);
        assert_eq!(core_graph.upward_incoming(1).len(), 2);
    }

    #[test]
    fn witnesses_should_prevent_shortcuts() {
        let mut store = GraphStore::new(["car"]);
        for i in 0..3 {
            store.add_node(GeoPoint::new(0.0, i as f64 * 0.01)).unwrap();
        }
        let flags = car_flags(50.0, true, true);
        store.add_edge(EdgeRecord::new(0, 1, meters!(1000), vec![], vec![flags])).unwrap();
        store.add_edge(EdgeRecord::new(1, 2, meters!(1000), vec![], vec![flags])).unwrap();
        store.add_edge(EdgeRecord::new(0, 2, meters!(1500), vec![], vec![flags])).unwrap();
        store.freeze();

        let core_graph = prepare(&store, Some(vec![true, false, true]));

        assert_eq!(core_graph.shortcut_count(), 0);
        assert_eq!(core_graph.core_outgoing(0), &[2]);
    }

    #[test]
    fn should_contract_everything_without_restrictions() {
        let store = romania_graph();
        let core_graph = prepare(&store, None);

        assert_eq!(core_graph.core_node_count(), 0);
        assert_eq!(core_graph.core_level(), store.node_count());
        assert!(core_graph.check());

        let mut ranks: Vec<usize> = (0..store.node_count()).map(|node| core_graph.rank(node)).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..store.node_count()).collect::<Vec<_>>());
    }

    #[test]
    fn restricted_edges_should_keep_their_nodes_in_the_core() {
        let store = romania_graph_with_attributes();
        let core_graph = prepare(&store, None);

        assert!(core_graph.check());
        for edge in store.edges() {
            if *store.edge_attributes(edge.id()) != EdgeAttributes::default() {
                assert!(core_graph.is_core(edge.start_node()));
                assert!(core_graph.is_core(edge.end_node()));
            }
        }

        // Shortcuts only skip contracted nodes
        let mut unfolded = Vec::new();
        for shortcut in core_graph.shortcuts() {
            unfolded.clear();
            core_graph.unfold_edge(shortcut.id, shortcut.start, &mut unfolded);
            for (edge_id, _) in unfolded.iter() {
                assert_eq!(*store.edge_attributes(*edge_id), EdgeAttributes::default());
            }
        }

        assert!(core_graph.is_core(RomaniaGraphCity::Bucharest.into()));
    }
}
