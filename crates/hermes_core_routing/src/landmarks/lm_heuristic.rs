use fxhash::FxHashMap;

use crate::{
    routing::{astar_heuristic::AStarHeuristic, search_direction::SearchDirection},
    types::NodeId,
    weighting::Weight,
};

use super::lm_data::LandmarkSet;

/// Landmark lower bound towards a set of core nodes, each with the weight
/// still needed from it to reach the actual target (or from the actual
/// source, for a backward search).
pub(crate) struct LandmarkHeuristic<'a> {
    landmarks: &'a LandmarkSet,
    targets: Vec<(NodeId, Weight)>,
    direction: SearchDirection,
    cache: FxHashMap<NodeId, Weight>,
}

impl<'a> LandmarkHeuristic<'a> {
    pub fn new(
        landmarks: &'a LandmarkSet,
        targets: Vec<(NodeId, Weight)>,
        direction: SearchDirection,
    ) -> Self {
        LandmarkHeuristic {
            landmarks,
            targets,
            direction,
            cache: FxHashMap::default(),
        }
    }
}

impl AStarHeuristic for LandmarkHeuristic<'_> {
    fn potential(&mut self, node: NodeId) -> Weight {
        if self.targets.is_empty() {
            return 0;
        }

        if let Some(potential) = self.cache.get(&node) {
            return *potential;
        }

        let potential = self
            .targets
            .iter()
            .map(|&(target, remaining)| {
                let bound = match self.direction {
                    SearchDirection::Forward => self.landmarks.bound(node, target),
                    SearchDirection::Backward => self.landmarks.bound(target, node),
                };
                bound.saturating_add(remaining)
            })
            .min()
            .unwrap_or(0);

        self.cache.insert(node, potential);
        potential
    }
}
