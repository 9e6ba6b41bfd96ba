use serde::{Deserialize, Serialize};

use crate::{
    constants::EARTH_RADIUS_METERS,
    distance::{Distance, Meters, meters},
};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn haversine_distance(&self, other: &GeoPoint) -> Distance<Meters> {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        meters!(EARTH_RADIUS_METERS * c)
    }
}

/// Length of a polyline, zero for fewer than two points.
pub fn polyline_distance(points: &[GeoPoint]) -> Distance<Meters> {
    points
        .windows(2)
        .map(|pair| pair[0].haversine_distance(&pair[1]))
        .sum()
}

impl From<&GeoPoint> for geo_types::Coord<f64> {
    fn from(value: &GeoPoint) -> Self {
        geo_types::coord! { x: value.lng, y: value.lat }
    }
}
