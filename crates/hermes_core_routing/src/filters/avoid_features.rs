use crate::{
    ch::core_restrictions::RestrictionKind,
    edge_direction::EdgeDirection,
    graph::{EdgeAttributes, EdgeRecord, attributes::WayCategory},
};

use super::EdgeFilter;

pub struct AvoidFeaturesEdgeFilter {
    avoided: WayCategory,
}

impl AvoidFeaturesEdgeFilter {
    pub fn new(avoided: WayCategory) -> Self {
        AvoidFeaturesEdgeFilter { avoided }
    }
}

impl EdgeFilter for AvoidFeaturesEdgeFilter {
    fn name(&self) -> &'static str {
        "avoid_features"
    }

    fn accept(&self, _edge: &EdgeRecord, attributes: &EdgeAttributes, _direction: EdgeDirection) -> bool {
        !attributes.way_category.intersects(self.avoided)
    }

    fn restriction_kind(&self) -> Option<RestrictionKind> {
        Some(RestrictionKind::WayCategory)
    }
}
