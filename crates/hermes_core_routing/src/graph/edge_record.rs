use crate::{
    distance::{Distance, Meters},
    geopoint::GeoPoint,
    types::{EdgeId, NodeId},
};

use super::GraphEdge;

/// An original edge of the road network. The geometry goes from
/// `base_node` to `adj_node` and there is one flags word per profile slot
/// of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    id: EdgeId,
    base_node: NodeId,
    adj_node: NodeId,
    distance: Distance<Meters>,
    geometry: Vec<GeoPoint>,
    flags: Vec<u64>,
}

impl EdgeRecord {
    pub fn new(
        base_node: NodeId,
        adj_node: NodeId,
        distance: Distance<Meters>,
        geometry: Vec<GeoPoint>,
        flags: Vec<u64>,
    ) -> Self {
        EdgeRecord {
            id: EdgeId::MAX,
            base_node,
            adj_node,
            distance,
            geometry,
            flags,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EdgeId) {
        self.id = id;
    }

    pub fn geometry(&self) -> &[GeoPoint] {
        &self.geometry
    }

    pub(crate) fn set_geometry(&mut self, geometry: Vec<GeoPoint>) {
        self.geometry = geometry;
    }

    pub fn flags(&self, slot: usize) -> u64 {
        self.flags.get(slot).copied().unwrap_or(0)
    }

    pub fn flag_words(&self) -> &[u64] {
        &self.flags
    }
}

impl GraphEdge for EdgeRecord {
    fn start_node(&self) -> NodeId {
        self.base_node
    }

    fn end_node(&self) -> NodeId {
        self.adj_node
    }

    fn distance(&self) -> Distance<Meters> {
        self.distance
    }
}
