use std::{fs, io::ErrorKind, path::Path};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Speed tables of a profile, in km/h.
///
/// The JSON document has four flat sections: `default` (per highway class),
/// `max_speeds` (per `<country>:<zone>` max speed value), `surface` and
/// `tracktype`. A surface speed of `-1` leaves the speed unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub default: FxHashMap<String, i32>,
    pub max_speeds: FxHashMap<String, i32>,
    pub surface: FxHashMap<String, i32>,
    pub tracktype: FxHashMap<String, i32>,
}

fn lowercase_keys(map: FxHashMap<String, i32>) -> FxHashMap<String, i32> {
    map.into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}

fn table(entries: &[(&str, i32)]) -> FxHashMap<String, i32> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

impl SpeedConfig {
    pub fn new(
        default: &[(&str, i32)],
        surface: &[(&str, i32)],
        tracktype: &[(&str, i32)],
    ) -> Self {
        SpeedConfig {
            default: table(default),
            max_speeds: FxHashMap::default(),
            surface: table(surface),
            tracktype: table(tracktype),
        }
    }

    pub fn with_max_speeds(mut self, max_speeds: &[(&str, i32)]) -> Self {
        self.max_speeds = table(max_speeds);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: SpeedConfig = serde_json::from_str(json)
            .map_err(|err| ConfigurationError::MalformedDocument(err.to_string()))?;

        Ok(SpeedConfig {
            default: lowercase_keys(config.default),
            max_speeds: lowercase_keys(config.max_speeds),
            surface: lowercase_keys(config.surface),
            tracktype: lowercase_keys(config.tracktype),
        })
    }

    /// Reads the document at `path`. A missing document is not an error,
    /// the profile keeps its built-in tables.
    pub fn from_path(path: &Path) -> Result<Option<Self>, ConfigurationError> {
        match fs::read_to_string(path) {
            Ok(json) => SpeedConfig::from_json_str(&json).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigurationError::UnreadableDocument(format!(
                "{}: {}",
                path.display(),
                err
            ))),
        }
    }

    /// Entries of `self` win over the ones of `defaults`.
    pub fn merged_over(self, defaults: &SpeedConfig) -> SpeedConfig {
        fn merge(
            overrides: FxHashMap<String, i32>,
            defaults: &FxHashMap<String, i32>,
        ) -> FxHashMap<String, i32> {
            let mut merged = defaults.clone();
            merged.extend(overrides);
            merged
        }

        SpeedConfig {
            default: merge(self.default, &defaults.default),
            max_speeds: merge(self.max_speeds, &defaults.max_speeds),
            surface: merge(self.surface, &defaults.surface),
            tracktype: merge(self.tracktype, &defaults.tracktype),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.default.contains_key(class)
    }

    pub fn class_speed(&self, class: &str) -> Option<f64> {
        self.default.get(class).map(|&speed| speed as f64)
    }

    pub fn zone_max_speed(&self, zone: &str) -> Option<f64> {
        self.max_speeds
            .get(&zone.to_lowercase())
            .map(|&speed| speed as f64)
    }

    /// `None` for unknown surfaces and for the `-1` marker.
    pub fn surface_speed(&self, surface: &str) -> Option<f64> {
        self.surface
            .get(surface)
            .filter(|&&speed| speed >= 0)
            .map(|&speed| speed as f64)
    }

    pub fn tracktype_speed(&self, tracktype: &str) -> Option<f64> {
        self.tracktype
            .get(tracktype)
            .filter(|&&speed| speed >= 0)
            .map(|&speed| speed as f64)
    }
}
