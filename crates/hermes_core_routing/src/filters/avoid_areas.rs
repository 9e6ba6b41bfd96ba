use geo::{BoundingRect, Intersects, LineString, Polygon, Rect};
use geo_types::Coord;

use crate::{
    ch::core_restrictions::RestrictionKind,
    edge_direction::EdgeDirection,
    graph::{EdgeAttributes, EdgeRecord},
};

use super::EdgeFilter;

/// Rejects edges whose geometry touches one of the polygons. Coordinates
/// are `(lng, lat)`.
pub struct AvoidAreasEdgeFilter {
    areas: Vec<(Rect<f64>, Polygon<f64>)>,
}

impl AvoidAreasEdgeFilter {
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        let areas = polygons
            .into_iter()
            .filter_map(|polygon| polygon.bounding_rect().map(|rect| (rect, polygon)))
            .collect();

        AvoidAreasEdgeFilter { areas }
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }
}

impl EdgeFilter for AvoidAreasEdgeFilter {
    fn name(&self) -> &'static str {
        "avoid_areas"
    }

    fn accept(&self, edge: &EdgeRecord, _attributes: &EdgeAttributes, _direction: EdgeDirection) -> bool {
        let line: LineString<f64> = edge
            .geometry()
            .iter()
            .map(Coord::<f64>::from)
            .collect();

        let Some(edge_rect) = line.bounding_rect() else {
            return true;
        };

        !self
            .areas
            .iter()
            .any(|(rect, polygon)| rect.intersects(&edge_rect) && polygon.intersects(&line))
    }

    fn restriction_kind(&self) -> Option<RestrictionKind> {
        None
    }
}
