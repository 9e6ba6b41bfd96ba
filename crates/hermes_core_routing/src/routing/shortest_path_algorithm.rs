use crate::{
    types::{EdgeId, NodeId},
    weighting::Weight,
};

/// Raw outcome of one search. Edges are in travel order, each with the node
/// it is traversed from, and may still contain shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SearchResult {
    Found {
        weight: Weight,
        edges: Vec<(EdgeId, NodeId)>,
        visited_nodes: usize,
    },
    NoPath {
        visited_nodes: usize,
    },
    Aborted {
        visited_nodes: usize,
    },
}

impl SearchResult {
    pub fn visited_nodes(&self) -> usize {
        match self {
            SearchResult::Found { visited_nodes, .. }
            | SearchResult::NoPath { visited_nodes }
            | SearchResult::Aborted { visited_nodes } => *visited_nodes,
        }
    }
}

pub(crate) trait ShortestPathAlgorithm {
    fn calc_path(&mut self, start: NodeId, end: NodeId) -> SearchResult;
}
