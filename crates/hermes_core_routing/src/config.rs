use serde::{Deserialize, Serialize};

use crate::{error::ConfigurationError, geopoint::GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Tuning of the core contraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorePreparationConfig {
    /// Refresh every remaining priority each time this percentage of the
    /// contractible nodes has been contracted. 0 disables the refresh.
    pub periodic_updates: usize,
    pub lazy_updates: bool,
    pub neighbor_updates: usize,
    pub witness_settled_nodes: usize,
    pub priority_witness_settled_nodes: usize,
}

impl Default for CorePreparationConfig {
    fn default() -> Self {
        CorePreparationConfig {
            periodic_updates: 20,
            lazy_updates: true,
            neighbor_updates: 3,
            witness_settled_nodes: 1_000,
            priority_witness_settled_nodes: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Server ceiling on the nodes a single search may settle.
    pub max_visited_nodes: usize,
    /// Used when the request does not ask for a limit.
    pub default_max_visited_nodes: usize,
    /// When set, requests cannot opt out of core routing.
    pub core_mandatory: bool,
    pub landmark_count: usize,
    pub bounds: Option<Bounds>,
    pub preparation: CorePreparationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_visited_nodes: 1_000_000,
            default_max_visited_nodes: 100_000,
            core_mandatory: false,
            landmark_count: 16,
            bounds: None,
            preparation: CorePreparationConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|err| ConfigurationError::InvalidEngineConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_visited_nodes == 0 {
            return Err(ConfigurationError::InvalidEngineConfig(String::from(
                "max_visited_nodes must be positive",
            )));
        }

        if self.default_max_visited_nodes > self.max_visited_nodes {
            return Err(ConfigurationError::InvalidEngineConfig(format!(
                "default_max_visited_nodes {} is above max_visited_nodes {}",
                self.default_max_visited_nodes, self.max_visited_nodes
            )));
        }

        if self.preparation.periodic_updates > 100 {
            return Err(ConfigurationError::InvalidEngineConfig(String::from(
                "periodic_updates is a percentage",
            )));
        }

        if let Some(bounds) = &self.bounds
            && (bounds.min_lat > bounds.max_lat || bounds.min_lng > bounds.max_lng)
        {
            return Err(ConfigurationError::InvalidEngineConfig(String::from(
                "bounds are inverted",
            )));
        }

        Ok(())
    }
}
