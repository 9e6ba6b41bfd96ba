pub mod attributes;
pub mod edge_record;
pub mod graph_store;
pub mod importer;
pub mod location_index;

use crate::{
    distance::{Distance, Meters},
    edge_direction::EdgeDirection,
    geopoint::GeoPoint,
    types::{EdgeId, NodeId},
};

pub use attributes::EdgeAttributes;
pub use edge_record::EdgeRecord;
pub use graph_store::GraphStore;

pub trait GraphEdge {
    fn start_node(&self) -> NodeId;
    fn end_node(&self) -> NodeId;
    fn adj_node(&self, node: NodeId) -> NodeId {
        if self.start_node() == node {
            self.end_node()
        } else {
            self.start_node()
        }
    }

    fn distance(&self) -> Distance<Meters>;
}

pub trait Graph {
    type Edge: GraphEdge;
    type EdgeIterator<'a>: Iterator<Item = EdgeId>
    where
        Self: 'a;

    fn edge_count(&self) -> usize;
    fn node_count(&self) -> usize;

    fn node_edges_iter(&self, node: NodeId) -> Self::EdgeIterator<'_>;
    fn edge(&self, edge: EdgeId) -> &Self::Edge;
    fn node_geometry(&self, node: NodeId) -> &GeoPoint;

    /// Direction in which `edge` is traversed when leaving `start`.
    fn edge_direction(&self, edge: EdgeId, start: NodeId) -> EdgeDirection;
}

/// Directed adjacency, used by searches that only follow edges in the
/// direction they can be traversed.
pub trait DirectedEdgeAccess {
    type EdgeIterator<'a>: Iterator<Item = EdgeId>
    where
        Self: 'a;

    fn node_count(&self) -> usize;
    fn outgoing_edges(&self, node: NodeId) -> Self::EdgeIterator<'_>;
    fn incoming_edges(&self, node: NodeId) -> Self::EdgeIterator<'_>;
}
