use crate::{constants::MAX_WEIGHT, types::NodeId, weighting::Weight};

/// Weights between every core node and a few landmarks, for one weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    weighting_name: String,
    landmarks: Vec<NodeId>,
    /// Weight from each landmark to each node
    from_weights: Vec<Vec<Weight>>,
    /// Weight from each node to each landmark
    to_weights: Vec<Vec<Weight>>,
}

impl LandmarkSet {
    pub fn new(
        weighting_name: String,
        landmarks: Vec<NodeId>,
        from_weights: Vec<Vec<Weight>>,
        to_weights: Vec<Vec<Weight>>,
    ) -> Self {
        debug_assert_eq!(landmarks.len(), from_weights.len());
        debug_assert_eq!(landmarks.len(), to_weights.len());

        LandmarkSet {
            weighting_name,
            landmarks,
            from_weights,
            to_weights,
        }
    }

    pub fn weighting_name(&self) -> &str {
        &self.weighting_name
    }

    pub fn landmarks(&self) -> &[NodeId] {
        &self.landmarks
    }

    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }

    /// Number of nodes the weights were computed for, 0 without landmarks.
    pub fn node_count(&self) -> usize {
        self.from_weights.first().map_or(0, Vec::len)
    }

    pub fn weight_from_landmark(&self, landmark: usize, node: NodeId) -> Weight {
        self.from_weights[landmark]
            .get(node)
            .copied()
            .unwrap_or(MAX_WEIGHT)
    }

    pub fn weight_to_landmark(&self, landmark: usize, node: NodeId) -> Weight {
        self.to_weights[landmark]
            .get(node)
            .copied()
            .unwrap_or(MAX_WEIGHT)
    }

    /// Lower bound of the weight from `from` to `to`, by the triangle
    /// inequality. Landmarks that cannot reach or be reached by one of the
    /// nodes are skipped.
    pub fn bound(&self, from: NodeId, to: NodeId) -> Weight {
        if from == to {
            return 0;
        }

        let mut lower_bound: Weight = 0;

        for landmark in 0..self.landmarks.len() {
            // from -> to -> landmark: d(from, L) <= d(from, to) + d(to, L)
            let from_to_landmark = self.weight_to_landmark(landmark, from);
            let to_to_landmark = self.weight_to_landmark(landmark, to);
            if from_to_landmark != MAX_WEIGHT && to_to_landmark != MAX_WEIGHT {
                lower_bound = lower_bound.max(from_to_landmark.saturating_sub(to_to_landmark));
            }

            // landmark -> from -> to: d(L, to) <= d(L, from) + d(from, to)
            let landmark_to_from = self.weight_from_landmark(landmark, from);
            let landmark_to_to = self.weight_from_landmark(landmark, to);
            if landmark_to_from != MAX_WEIGHT && landmark_to_to != MAX_WEIGHT {
                lower_bound = lower_bound.max(landmark_to_to.saturating_sub(landmark_to_from));
            }
        }

        lower_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_take_the_tightest_landmark() {
        // Line 0 - 1 - 2 with weights 10 and 20, landmarks at both ends
        let landmarks = LandmarkSet::new(
            String::from("car_fastest"),
            vec![0, 2],
            vec![vec![0, 10, 30], vec![30, 20, 0]],
            vec![vec![0, 10, 30], vec![30, 20, 0]],
        );

        assert_eq!(landmarks.bound(0, 2), 30);
        assert_eq!(landmarks.bound(1, 2), 20);
        assert_eq!(landmarks.bound(2, 1), 20);
        assert_eq!(landmarks.bound(1, 1), 0);
    }

    #[test]
    fn should_skip_unreachable_landmarks() {
        let landmarks = LandmarkSet::new(
            String::from("car_fastest"),
            vec![0, 2],
            vec![vec![0, 10, MAX_WEIGHT], vec![MAX_WEIGHT, MAX_WEIGHT, MAX_WEIGHT]],
            vec![vec![0, 10, MAX_WEIGHT], vec![MAX_WEIGHT, MAX_WEIGHT, MAX_WEIGHT]],
        );

        assert_eq!(landmarks.bound(0, 1), 10);
        assert_eq!(landmarks.bound(0, 2), 0);
        assert_eq!(landmarks.bound(1, 7), 0);
    }
}
