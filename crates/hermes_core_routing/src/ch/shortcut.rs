use crate::{
    distance::{Distance, Meters},
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight},
};

/// A directed edge from `start` to `end` replacing the two edges around a
/// contracted node.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortcut {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,

    /// Skipped edge incoming to the contracted node
    pub incoming_edge: EdgeId,

    /// Skipped edge outgoing from the contracted node
    pub outgoing_edge: EdgeId,

    pub distance: Distance<Meters>,
    pub time: Milliseconds,
    pub weight: Weight,

    /// Number of original edges the shortcut stands for.
    pub original_edges: usize,
}
