use geo::{LineString, Polygon};
use serde::Deserialize;

use crate::{
    error::RequestError,
    geopoint::GeoPoint,
    graph::attributes::{VehicleTypes, WayCategory},
};

use super::{
    AvoidAreasEdgeFilter, AvoidBordersEdgeFilter, AvoidFeaturesEdgeFilter, BorderRule,
    EdgeFilterChain, VehicleEdgeFilter, VehicleParams, WheelchairEdgeFilter, WheelchairParams,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BorderParams {
    pub rule: BorderRule,
    #[serde(default)]
    pub avoid_countries: Vec<u16>,
    #[serde(default)]
    pub open_border_groups: Vec<Vec<u16>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VehicleRequestParams {
    pub types: Vec<String>,
    pub hazmat: bool,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub axle_load: Option<f64>,
}

/// Filter options of a route request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Outer rings of `[lng, lat]` pairs.
    pub avoid_polygons: Vec<Vec<[f64; 2]>>,
    pub avoid_features: Vec<String>,
    pub avoid_borders: Option<BorderParams>,
    pub vehicle: Option<VehicleRequestParams>,
    pub wheelchair: Option<WheelchairParams>,
}

fn malformed(message: impl Into<String>) -> RequestError {
    RequestError::MalformedFilter(message.into())
}

fn check_measure(name: &str, value: Option<f64>) -> Result<(), RequestError> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(malformed(format!("`{name}` must be a positive number, got {value}")))
        }
        _ => Ok(()),
    }
}

fn polygon(ring: &[[f64; 2]]) -> Result<Polygon<f64>, RequestError> {
    if ring.len() < 3 {
        return Err(malformed(format!(
            "a polygon needs at least 3 points, got {}",
            ring.len()
        )));
    }

    if let Some([lng, lat]) = ring
        .iter()
        .find(|[lng, lat]| !GeoPoint::new(*lat, *lng).is_valid())
    {
        return Err(malformed(format!("invalid polygon coordinates ({lng}, {lat})")));
    }

    let exterior: LineString<f64> = ring.iter().map(|[lng, lat]| (*lng, *lat)).collect();
    Ok(Polygon::new(exterior, vec![]))
}

impl FilterParams {
    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|err| malformed(err.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterParams::default()
    }

    pub fn build(&self) -> Result<EdgeFilterChain, RequestError> {
        let mut chain = EdgeFilterChain::new();

        if !self.avoid_polygons.is_empty() {
            let polygons = self
                .avoid_polygons
                .iter()
                .map(|ring| polygon(ring))
                .collect::<Result<Vec<_>, _>>()?;
            chain.push(Box::new(AvoidAreasEdgeFilter::new(polygons)));
        }

        if !self.avoid_features.is_empty() {
            let mut avoided = WayCategory::NONE;
            for feature in &self.avoid_features {
                let category = WayCategory::from_name(feature)
                    .ok_or_else(|| malformed(format!("unknown feature `{feature}`")))?;
                avoided.insert(category);
            }
            chain.push(Box::new(AvoidFeaturesEdgeFilter::new(avoided)));
        }

        if let Some(borders) = &self.avoid_borders {
            let filter = borders.open_border_groups.iter().fold(
                AvoidBordersEdgeFilter::new(borders.rule)
                    .with_avoided_countries(borders.avoid_countries.iter().copied()),
                |filter, group| filter.with_open_border_group(group.iter().copied()),
            );
            chain.push(Box::new(filter));
        }

        if let Some(vehicle) = &self.vehicle {
            chain.push(Box::new(VehicleEdgeFilter::new(vehicle.to_params()?)));
        }

        if let Some(wheelchair) = &self.wheelchair {
            check_measure("max_incline", wheelchair.max_incline)?;
            check_measure("max_kerb_height", wheelchair.max_kerb_height)?;
            check_measure("min_width", wheelchair.min_width)?;
            chain.push(Box::new(WheelchairEdgeFilter::new(*wheelchair)));
        }

        Ok(chain)
    }
}

impl VehicleRequestParams {
    fn to_params(&self) -> Result<VehicleParams, RequestError> {
        let mut types = VehicleTypes::NONE;
        for name in &self.types {
            let vehicle_type = VehicleTypes::from_name(name)
                .ok_or_else(|| malformed(format!("unknown vehicle type `{name}`")))?;
            types.insert(vehicle_type);
        }

        check_measure("height", self.height)?;
        check_measure("width", self.width)?;
        check_measure("weight", self.weight)?;
        check_measure("length", self.length)?;
        check_measure("axle_load", self.axle_load)?;

        Ok(VehicleParams {
            types,
            hazmat: self.hazmat,
            height: self.height,
            width: self.width,
            weight: self.weight,
            length: self.length,
            axle_load: self.axle_load,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ch::core_restrictions::{CoreRestrictions, RestrictionKind};

    use super::*;

    #[test]
    fn empty_params_should_build_an_empty_chain() {
        let params = FilterParams::from_json_str("{}").unwrap();

        assert!(params.is_empty());
        assert!(params.build().unwrap().is_empty());
    }

    #[test]
    fn should_build_filters_in_order() {
        let params = FilterParams::from_json_str(
            r#"{
                "avoid_features": ["tollways", "ferries"],
                "avoid_borders": { "rule": "avoid_controlled", "open_border_groups": [[1, 2]] },
                "vehicle": { "types": ["hgv"], "height": 4.0 },
                "wheelchair": { "max_incline": 6.0 }
            }"#,
        )
        .unwrap();

        let chain = params.build().unwrap();

        assert_eq!(chain.len(), 4);
        assert_eq!(
            format!("{:?}", chain),
            r#"["avoid_features", "avoid_borders", "vehicle", "wheelchair"]"#
        );
        assert!(chain.covered_by(&CoreRestrictions::all()));
        assert!(!chain.covered_by(&CoreRestrictions::new([RestrictionKind::WayCategory])));
    }

    #[test]
    fn polygons_are_never_covered_by_a_core() {
        let params = FilterParams::from_json_str(
            r#"{ "avoid_polygons": [[[7.0, 48.0], [7.1, 48.0], [7.1, 48.1], [7.0, 48.1]]] }"#,
        )
        .unwrap();

        let chain = params.build().unwrap();
        assert_eq!(chain.len(), 1);
        assert!(!chain.covered_by(&CoreRestrictions::all()));
    }

    #[test]
    fn should_reject_malformed_params() {
        let malformed_documents = [
            r#"{ "avoid_features": ["ladders"] }"#,
            r#"{ "avoid_polygons": [[[7.0, 48.0], [7.1, 48.0]]] }"#,
            r#"{ "avoid_polygons": [[[7.0, 48.0], [7.1, 95.0], [7.2, 48.0]]] }"#,
            r#"{ "vehicle": { "types": ["tank"] } }"#,
            r#"{ "vehicle": { "weight": -3.0 } }"#,
            r#"{ "wheelchair": { "min_width": -1.0 } }"#,
        ];

        for document in malformed_documents {
            let params = FilterParams::from_json_str(document).unwrap();
            assert!(
                matches!(params.build(), Err(RequestError::MalformedFilter(_))),
                "{document}"
            );
        }

        assert!(matches!(
            FilterParams::from_json_str(r#"{ "avoid_borders": { "rule": "avoid_some" } }"#),
            Err(RequestError::MalformedFilter(_))
        ));
    }
}
