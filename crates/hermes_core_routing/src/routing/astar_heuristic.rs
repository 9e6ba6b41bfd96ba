use crate::{types::NodeId, weighting::Weight};

pub trait AStarHeuristic {
    /// Lower bound of the remaining weight from `node`.
    fn potential(&mut self, node: NodeId) -> Weight;
}

/// Turns an A* search into Dijkstra.
pub struct ZeroHeuristic;

impl AStarHeuristic for ZeroHeuristic {
    fn potential(&mut self, _node: NodeId) -> Weight {
        0
    }
}
