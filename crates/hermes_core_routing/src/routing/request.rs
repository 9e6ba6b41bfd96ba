use serde::Deserialize;

use crate::{error::RequestError, filters::FilterParams, geopoint::GeoPoint};

fn default_weighting() -> String {
    String::from("fastest")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    pub disable_core: bool,
    pub disable_landmarks: bool,
    /// Falls back to the server default when missing.
    pub max_visited_nodes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRequest {
    pub points: Vec<GeoPoint>,
    pub profile: String,
    #[serde(default = "default_weighting")]
    pub weighting: String,
    #[serde(default)]
    pub options: RouteOptions,
    #[serde(default)]
    pub filters: FilterParams,
}

impl RouteRequest {
    pub fn new(points: Vec<GeoPoint>, profile: impl Into<String>) -> Self {
        RouteRequest {
            points,
            profile: profile.into(),
            weighting: default_weighting(),
            options: RouteOptions::default(),
            filters: FilterParams::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|err| RequestError::MalformedRequest(err.to_string()))
    }
}
