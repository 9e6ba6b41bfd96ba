use serde::Deserialize;

use crate::{
    ch::core_restrictions::RestrictionKind,
    edge_direction::EdgeDirection,
    graph::{EdgeAttributes, EdgeRecord},
};

use super::EdgeFilter;

/// Limits of a wheelchair user. Lengths are in centimeters, the incline is
/// a percentage and classes grow with roughness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WheelchairParams {
    pub max_incline: Option<f64>,
    pub max_kerb_height: Option<f64>,
    pub min_width: Option<f64>,
    pub max_surface: Option<u8>,
    pub max_smoothness: Option<u8>,
    pub max_track_type: Option<u8>,
}

fn above<T: PartialOrd>(value: Option<T>, limit: Option<T>) -> bool {
    matches!((value, limit), (Some(value), Some(limit)) if value > limit)
}

/// Edges with unknown attributes are accepted.
pub struct WheelchairEdgeFilter {
    params: WheelchairParams,
}

impl WheelchairEdgeFilter {
    pub fn new(params: WheelchairParams) -> Self {
        WheelchairEdgeFilter { params }
    }
}

impl EdgeFilter for WheelchairEdgeFilter {
    fn name(&self) -> &'static str {
        "wheelchair"
    }

    fn accept(&self, _edge: &EdgeRecord, attributes: &EdgeAttributes, _direction: EdgeDirection) -> bool {
        let wheelchair = &attributes.wheelchair;
        let params = &self.params;

        let too_narrow = matches!(
            (wheelchair.width, params.min_width),
            (Some(width), Some(min_width)) if width < min_width
        );

        !(too_narrow
            || above(wheelchair.incline.map(f64::abs), params.max_incline)
            || above(wheelchair.kerb_height, params.max_kerb_height)
            || above(wheelchair.surface, params.max_surface)
            || above(wheelchair.smoothness, params.max_smoothness)
            || above(wheelchair.track_type, params.max_track_type))
    }

    fn restriction_kind(&self) -> Option<RestrictionKind> {
        Some(RestrictionKind::Wheelchair)
    }
}

#[cfg(test)]
mod tests {
    use crate::{distance::meters, graph::attributes::WheelchairAttributes};

    use super::*;

    fn attributes(wheelchair: WheelchairAttributes) -> EdgeAttributes {
        EdgeAttributes {
            wheelchair,
            ..EdgeAttributes::default()
        }
    }

    #[test]
    fn should_reject_edges_over_the_limits() {
        let edge = EdgeRecord::new(0, 1, meters!(50), vec![], vec![0]);
        let filter = WheelchairEdgeFilter::new(WheelchairParams {
            max_incline: Some(6.0),
            max_kerb_height: Some(3.0),
            min_width: Some(90.0),
            max_surface: Some(2),
            ..WheelchairParams::default()
        });

        let steep = attributes(WheelchairAttributes {
            incline: Some(-8.0),
            ..WheelchairAttributes::default()
        });
        let kerb = attributes(WheelchairAttributes {
            kerb_height: Some(6.0),
            ..WheelchairAttributes::default()
        });
        let narrow = attributes(WheelchairAttributes {
            width: Some(70.0),
            ..WheelchairAttributes::default()
        });
        let gravel = attributes(WheelchairAttributes {
            surface: Some(4),
            smoothness: Some(6),
            ..WheelchairAttributes::default()
        });
        let fine = attributes(WheelchairAttributes {
            incline: Some(5.0),
            kerb_height: Some(2.0),
            width: Some(150.0),
            surface: Some(1),
            track_type: Some(5),
            ..WheelchairAttributes::default()
        });

        for rejected in [steep, kerb, narrow, gravel] {
            assert!(!filter.accept(&edge, &rejected, EdgeDirection::Forward));
        }
        assert!(filter.accept(&edge, &fine, EdgeDirection::Forward));
        assert!(filter.accept(&edge, &EdgeAttributes::default(), EdgeDirection::Forward));
    }
}
