use fxhash::FxHashSet;

use crate::{
    ch::core_restrictions::RestrictionKind,
    edge_direction::EdgeDirection,
    graph::{EdgeAttributes, EdgeRecord, attributes::VehicleTypes},
    types::EdgeId,
};

use super::EdgeFilter;

/// Vehicle described by a request. Dimensions are in meters and tonnes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleParams {
    pub types: VehicleTypes,
    pub hazmat: bool,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub axle_load: Option<f64>,
}

fn exceeds(limit: Option<f64>, value: Option<f64>) -> bool {
    matches!((limit, value), (Some(limit), Some(value)) if value > limit)
}

pub struct VehicleEdgeFilter {
    params: VehicleParams,
    destination_edges: Option<FxHashSet<EdgeId>>,
}

impl VehicleEdgeFilter {
    pub fn new(params: VehicleParams) -> Self {
        VehicleEdgeFilter {
            params,
            destination_edges: None,
        }
    }

    /// Restricts destination-only edges to the given ones, usually the
    /// edges next to the waypoints.
    pub fn with_destination_edges(mut self, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        self.destination_edges = Some(edges.into_iter().collect());
        self
    }
}

impl EdgeFilter for VehicleEdgeFilter {
    fn name(&self) -> &'static str {
        "vehicle"
    }

    fn accept(&self, edge: &EdgeRecord, attributes: &EdgeAttributes, _direction: EdgeDirection) -> bool {
        let restrictions = &attributes.vehicle;
        let params = &self.params;

        if restrictions.restricted_types.intersects(params.types) {
            return false;
        }

        if restrictions.destination_types.intersects(params.types)
            && let Some(destination_edges) = &self.destination_edges
            && !destination_edges.contains(&edge.id())
        {
            return false;
        }

        if params.hazmat && restrictions.hazmat_forbidden {
            return false;
        }

        !(exceeds(restrictions.max_height, params.height)
            || exceeds(restrictions.max_width, params.width)
            || exceeds(restrictions.max_weight, params.weight)
            || exceeds(restrictions.max_length, params.length)
            || exceeds(restrictions.max_axle_load, params.axle_load))
    }

    fn restriction_kind(&self) -> Option<RestrictionKind> {
        Some(RestrictionKind::Vehicle)
    }
}
