pub mod avoid_areas;
pub mod avoid_borders;
pub mod avoid_features;
pub mod filter_params;
pub mod vehicle;
pub mod wheelchair;

use std::fmt;

use crate::{
    ch::core_restrictions::{CoreRestrictions, RestrictionKind},
    edge_direction::EdgeDirection,
    graph::{EdgeAttributes, EdgeRecord, GraphStore},
};

pub use avoid_areas::AvoidAreasEdgeFilter;
pub use avoid_borders::{AvoidBordersEdgeFilter, BorderCrossing, BorderRule};
pub use avoid_features::AvoidFeaturesEdgeFilter;
pub use filter_params::FilterParams;
pub use vehicle::{VehicleEdgeFilter, VehicleParams};
pub use wheelchair::{WheelchairEdgeFilter, WheelchairParams};

pub trait EdgeFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the edge may be traversed in `direction`.
    fn accept(&self, edge: &EdgeRecord, attributes: &EdgeAttributes, direction: EdgeDirection) -> bool;

    /// Attribute kind the filter inspects. A core prepared with that kind
    /// keeps every edge carrying it uncontracted. `None` when no core can
    /// serve the filter.
    fn restriction_kind(&self) -> Option<RestrictionKind>;
}

/// Ordered list of filters, an edge must be accepted by all of them.
#[derive(Default)]
pub struct EdgeFilterChain {
    filters: Vec<Box<dyn EdgeFilter>>,
}

impl fmt::Debug for EdgeFilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

impl EdgeFilterChain {
    pub fn new() -> Self {
        EdgeFilterChain::default()
    }

    pub fn push(&mut self, filter: Box<dyn EdgeFilter>) {
        self.filters.push(filter);
    }

    pub fn with(mut self, filter: impl EdgeFilter + 'static) -> Self {
        self.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn accept(&self, store: &GraphStore, edge: &EdgeRecord, direction: EdgeDirection) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        let attributes = store.edge_attributes(edge.id());
        self.filters
            .iter()
            .all(|filter| filter.accept(edge, attributes, direction))
    }

    /// Whether a core prepared with `restrictions` never hides an edge one
    /// of the filters would reject.
    pub fn covered_by(&self, restrictions: &CoreRestrictions) -> bool {
        self.filters.iter().all(|filter| {
            filter
                .restriction_kind()
                .is_some_and(|kind| restrictions.contains(kind))
        })
    }
}
