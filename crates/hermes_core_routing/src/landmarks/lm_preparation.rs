use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info};

use crate::{
    ch::core_graph::CoreGraph, constants::MAX_WEIGHT, routing::search_direction::SearchDirection,
    stopwatch::Stopwatch, types::NodeId, weighting::Weight,
};

use super::{landmark_search::LandmarkSearch, lm_data::LandmarkSet};

/// Selects landmarks among the core nodes and computes their weights over
/// the core adjacency.
pub struct LandmarkPreparation<'a> {
    core_graph: &'a CoreGraph,
}

impl<'a> LandmarkPreparation<'a> {
    pub fn new(core_graph: &'a CoreGraph) -> Self {
        Self { core_graph }
    }

    pub fn create_landmarks(&self, landmark_count: usize) -> LandmarkSet {
        let mut stopwatch = Stopwatch::new("landmarks_preparation");
        stopwatch.start();

        info!(
            weighting = self.core_graph.weighting_name(),
            "Start LM preparation"
        );
        let landmarks = self.find_landmarks(landmark_count);

        info!("Found all {} landmarks", landmarks.len());

        let (from_weights, to_weights): (Vec<Vec<Weight>>, Vec<Vec<Weight>>) = landmarks
            .par_iter()
            .map(|&node_id| self.create_landmark(node_id))
            .unzip();

        stopwatch.stop();
        info!(
            weighting = self.core_graph.weighting_name(),
            "Finished LM preparation in {}ms",
            stopwatch.total_duration().as_millis()
        );

        LandmarkSet::new(
            self.core_graph.weighting_name().to_string(),
            landmarks,
            from_weights,
            to_weights,
        )
    }

    fn create_landmark(&self, node_id: NodeId) -> (Vec<Weight>, Vec<Weight>) {
        let node_count = self.core_graph.node_count();

        // Weights from the landmark, with a forward search starting from it
        let mut forward_search = LandmarkSearch::new(node_count);
        forward_search.run(self.core_graph, &[node_id], SearchDirection::Forward);

        // Weights to the landmark, with a backward search starting from it
        let mut backward_search = LandmarkSearch::new(node_count);
        backward_search.run(self.core_graph, &[node_id], SearchDirection::Backward);

        (forward_search.into_weights(), backward_search.into_weights())
    }

    /// Farthest point selection. The first search starts from the smallest
    /// core node, every next one from all landmarks found so far. Core nodes
    /// no landmark reaches are picked before any farther reachable node.
    pub fn find_landmarks(&self, landmark_count: usize) -> Vec<NodeId> {
        let mut landmarks: Vec<NodeId> = Vec::with_capacity(landmark_count);

        let Some(seed) = self.core_graph.core_nodes().next() else {
            debug!("No core node, no landmark");
            return landmarks;
        };

        let mut landmark_search = LandmarkSearch::new(self.core_graph.node_count());

        while landmarks.len() < landmark_count {
            landmark_search.reset();

            let starts = if landmarks.is_empty() {
                vec![seed]
            } else {
                landmarks.clone()
            };

            let farthest =
                landmark_search.run(self.core_graph, &starts, SearchDirection::Forward);

            let unreached = self
                .core_graph
                .core_nodes()
                .find(|&node| landmark_search.weights()[node] == MAX_WEIGHT);

            let landmark = match (unreached, farthest) {
                (Some(node), _) => node,
                (None, Some(node)) if !landmarks.contains(&node) => node,
                // Every core node is a landmark already
                _ => break,
            };

            landmarks.push(landmark);
        }

        landmarks
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::{
        ch::{core_preparation::CorePreparation, core_restrictions::CoreRestrictions},
        config::CorePreparationConfig,
        graph::Graph,
        landmarks::lm_heuristic::LandmarkHeuristic,
        routing::astar_heuristic::AStarHeuristic,
        test_graph_utils::test_graph::{RomaniaGraphCity, car_weighting, romania_graph},
    };

    use super::*;

    fn romania_core() -> CoreGraph {
        let store = romania_graph();
        let weighting = car_weighting(&store);
        CorePreparation::new(
            &store,
            weighting.as_ref(),
            CoreRestrictions::none(),
            CorePreparationConfig::default(),
        )
        .unwrap()
        .with_core_nodes(vec![true; store.node_count()])
        .prepare()
    }

    /// Weights between every pair of core nodes.
    fn all_pairs(core_graph: &CoreGraph) -> Vec<Vec<Weight>> {
        (0..core_graph.node_count())
            .map(|node| {
                let mut search = LandmarkSearch::new(core_graph.node_count());
                search.run(core_graph, &[node], SearchDirection::Forward);
                search.into_weights()
            })
            .collect()
    }

    #[test]
    fn should_select_distinct_landmarks() {
        let core_graph = romania_core();
        let preparation = LandmarkPreparation::new(&core_graph);

        let landmarks = preparation.find_landmarks(4);
        assert_eq!(landmarks.len(), 4);

        let mut distinct = landmarks.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 4);

        // Never more landmarks than core nodes
        assert_eq!(preparation.find_landmarks(50).len(), core_graph.node_count());
    }

    #[test]
    fn first_landmark_should_be_farthest_from_seed() {
        let core_graph = romania_core();
        let landmarks = LandmarkPreparation::new(&core_graph).find_landmarks(1);

        let from_arad = &all_pairs(&core_graph)[RomaniaGraphCity::Arad as usize];
        let farthest = (0..core_graph.node_count())
            .max_by_key(|&node| from_arad[node])
            .unwrap();
        assert_eq!(landmarks, vec![farthest]);
    }

    #[test]
    fn landmark_bounds_should_be_admissible() {
        let core_graph = romania_core();
        let landmarks = LandmarkPreparation::new(&core_graph).create_landmarks(4);
        let weights = all_pairs(&core_graph);

        assert_eq!(landmarks.weighting_name(), "car_fastest");
        assert_eq!(landmarks.landmark_count(), 4);

        for from in 0..core_graph.node_count() {
            for to in 0..core_graph.node_count() {
                assert!(
                    landmarks.bound(from, to) <= weights[from][to],
                    "bound from {from} to {to} overestimates"
                );
            }
        }
    }

    #[test]
    fn potentials_should_not_overestimate_sampled_pairs() {
        let core_graph = romania_core();
        let landmarks = LandmarkPreparation::new(&core_graph).create_landmarks(3);
        let weights = all_pairs(&core_graph);
        let node_count = core_graph.node_count();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let target = rng.random_range(0..node_count);
            let u = rng.random_range(0..node_count);
            let v = rng.random_range(0..node_count);

            let mut heuristic =
                LandmarkHeuristic::new(&landmarks, vec![(target, 0)], SearchDirection::Forward);
            let (potential_u, potential_v) = (heuristic.potential(u), heuristic.potential(v));

            assert!(potential_u <= weights[u][target]);
            assert!(potential_u.abs_diff(potential_v) <= weights[u][v].max(weights[v][u]));
            assert!(potential_u.saturating_sub(potential_v) <= weights[u][v]);
        }
    }
}
