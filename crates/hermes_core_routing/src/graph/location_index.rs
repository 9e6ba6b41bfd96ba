use std::fmt;

use rstar::primitives::GeomWithData;
use rstar::{AABB, PointDistance, RStarInsertionStrategy, RTree, RTreeObject, RTreeParams};

use crate::{
    distance::{Distance, Meters},
    geopoint::GeoPoint,
    types::{EdgeId, NodeId},
    weighting::Weighting,
};

use super::{Graph, GraphEdge, graph_store::GraphStore};

/// One segment of an edge geometry, in `[lng, lat]` coordinates.
struct IndexedLine {
    start: [f64; 2],
    end: [f64; 2],
}

impl IndexedLine {
    fn new(start: &GeoPoint, end: &GeoPoint) -> Self {
        IndexedLine {
            start: [start.lng(), start.lat()],
            end: [end.lng(), end.lat()],
        }
    }

    /// Closest point of the segment, projected in the plane of the
    /// coordinates.
    fn closest_point(&self, point: &[f64; 2]) -> [f64; 2] {
        let dx = self.end[0] - self.start[0];
        let dy = self.end[1] - self.start[1];
        let length_2 = dx * dx + dy * dy;

        if length_2 == 0.0 {
            return self.start;
        }

        let t = (((point[0] - self.start[0]) * dx + (point[1] - self.start[1]) * dy) / length_2)
            .clamp(0.0, 1.0);

        [self.start[0] + t * dx, self.start[1] + t * dy]
    }
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.start, self.end)
    }
}

impl PointDistance for IndexedLine {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let closest = self.closest_point(point);
        let dx = closest[0] - point[0];
        let dy = closest[1] - point[1];
        dx * dx + dy * dy
    }
}

struct IndexedData {
    edge_id: EdgeId,
}

type LocationIndexObject = GeomWithData<IndexedLine, IndexedData>;

struct LocationIndexTreeParams;

impl RTreeParams for LocationIndexTreeParams {
    type DefaultInsertionStrategy = RStarInsertionStrategy;

    const MAX_SIZE: usize = 64;
    const MIN_SIZE: usize = 28;
    const REINSERTION_COUNT: usize = 5;
}

/// A waypoint matched to the road network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub edge_id: EdgeId,
    /// End node of the edge closest to the projected point.
    pub node: NodeId,
    pub closest_point: GeoPoint,
    pub distance: Distance<Meters>,
}

pub struct LocationIndex {
    tree: RTree<LocationIndexObject, LocationIndexTreeParams>,
}

impl fmt::Debug for LocationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationIndex")
            .field("segments", &self.tree.size())
            .finish()
    }
}

impl LocationIndex {
    pub fn build(graph: &GraphStore) -> LocationIndex {
        let tree: RTree<LocationIndexObject, LocationIndexTreeParams> =
            RTree::bulk_load_with_params(
                (0..graph.edge_count())
                    .flat_map(|edge_id| {
                        graph.edge(edge_id).geometry().windows(2).map(move |c| {
                            LocationIndexObject::new(
                                IndexedLine::new(&c[0], &c[1]),
                                IndexedData { edge_id },
                            )
                        })
                    })
                    .collect(),
            );

        LocationIndex { tree }
    }

    pub fn snap(
        &self,
        graph: &GraphStore,
        weighting: &dyn Weighting,
        coordinates: &GeoPoint,
    ) -> Option<Snap> {
        let query = [coordinates.lng(), coordinates.lat()];

        self.tree
            .nearest_neighbor_iter(&query)
            // Only edges the weighting can use in some direction.
            .find(|nearest_neighbor| weighting.can_access_edge(graph.edge(nearest_neighbor.data.edge_id)))
            .map(|nearest_neighbor| {
                let edge = graph.edge(nearest_neighbor.data.edge_id);
                let [lng, lat] = nearest_neighbor.geom().closest_point(&query);
                let closest_point = GeoPoint::new(lat, lng);

                let start = closest_point.haversine_distance(graph.node_geometry(edge.start_node()));
                let end = closest_point.haversine_distance(graph.node_geometry(edge.end_node()));
                let node = if start <= end {
                    edge.start_node()
                } else {
                    edge.end_node()
                };

                Snap {
                    edge_id: edge.id(),
                    node,
                    closest_point,
                    distance: coordinates.haversine_distance(&closest_point),
                }
            })
    }
}
