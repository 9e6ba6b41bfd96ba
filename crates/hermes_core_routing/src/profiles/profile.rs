use std::fmt;

use crate::error::ConfigurationError;

use super::{
    acceleration::AccelerationModel, priority::PriorityRule, speed_config::SpeedConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Car,
    HeavyVehicle,
    Emergency,
    Foot,
    Wheelchair,
    RegularBike,
    MountainBike,
    RoadBike,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 8] = [
        ProfileKind::Car,
        ProfileKind::HeavyVehicle,
        ProfileKind::Emergency,
        ProfileKind::Foot,
        ProfileKind::Wheelchair,
        ProfileKind::RegularBike,
        ProfileKind::MountainBike,
        ProfileKind::RoadBike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Car => "car",
            ProfileKind::HeavyVehicle => "hgv",
            ProfileKind::Emergency => "emergency",
            ProfileKind::Foot => "foot",
            ProfileKind::Wheelchair => "wheelchair",
            ProfileKind::RegularBike => "bike",
            ProfileKind::MountainBike => "mtb",
            ProfileKind::RoadBike => "roadbike",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ProfileKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
    }

    pub fn is_motor_vehicle(&self) -> bool {
        matches!(
            self,
            ProfileKind::Car | ProfileKind::HeavyVehicle | ProfileKind::Emergency
        )
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which oneway tags the profile honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnewayMode {
    Motor,
    Bike,
    Foot,
}

/// Extra rejection applied after the generic acceptance checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectRule {
    pub key: &'static str,
    pub values: &'static [&'static str],
}

/// A way without `highway` tag that the profile still routes on, with the
/// speed class it is treated as.
#[derive(Debug, Clone, PartialEq)]
pub struct NonHighway {
    pub key: &'static str,
    pub value: &'static str,
    pub class: &'static str,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub kind: ProfileKind,
    /// Access keys, most specific first.
    pub restrictions: &'static [&'static str],
    pub restricted_values: &'static [&'static str],
    pub intended_values: &'static [&'static str],
    pub pass_barriers: &'static [&'static str],
    pub block_barriers: &'static [&'static str],
    pub speeds: SpeedConfig,
    pub speed_factor: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub max_speed_keys: &'static [&'static str],
    pub max_speed_factor: f64,
    pub destination_speed: Option<f64>,
    pub ferry_speed: Option<f64>,
    pub block_fords: bool,
    pub turn_costs: bool,
    pub max_track_grade_level: u8,
    /// Ways with a `maxwidth` below this are rejected.
    pub min_max_width: Option<f64>,
    pub acceleration: Option<AccelerationModel>,
    pub residential_penalty: bool,
    pub oneway: OnewayMode,
    pub non_highways: Vec<NonHighway>,
    pub rejections: Vec<RejectRule>,
    pub priority_rules: Vec<PriorityRule>,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Applies a configuration document over the built-in speed tables.
    pub fn with_speed_config(mut self, document: Option<SpeedConfig>) -> Self {
        if let Some(document) = document {
            self.speeds = document.merged_over(&self.speeds);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidProfile {
            profile: self.name().to_string(),
            reason,
        };

        if self.speed_factor <= 0.0 {
            return Err(invalid(format!(
                "speed factor must be positive, got {}",
                self.speed_factor
            )));
        }

        if self.min_speed <= 0.0 || self.min_speed > self.max_speed {
            return Err(invalid(format!(
                "speed range [{}, {}] is empty",
                self.min_speed, self.max_speed
            )));
        }

        if self.max_speed / self.speed_factor > 255.0 {
            return Err(invalid(format!(
                "max speed {} does not fit the speed field",
                self.max_speed
            )));
        }

        if self.speeds.default.is_empty() {
            return Err(invalid(String::from("no highway class has a speed")));
        }

        if let Some((class, speed)) = self
            .speeds
            .default
            .iter()
            .find(|(_, speed)| **speed <= 0)
        {
            return Err(invalid(format!("class `{class}` has speed {speed}")));
        }

        // Turn costs need an edge-based graph, the store is node-based
        if self.turn_costs {
            return Err(invalid(String::from("turn costs are not supported")));
        }

        Ok(())
    }

    pub fn all() -> Vec<Profile> {
        ProfileKind::ALL
            .into_iter()
            .map(Profile::for_kind)
            .collect()
    }

    pub fn for_kind(kind: ProfileKind) -> Profile {
        match kind {
            ProfileKind::Car => super::car::profile(),
            ProfileKind::HeavyVehicle => super::hgv::profile(),
            ProfileKind::Emergency => super::emergency::profile(),
            ProfileKind::Foot => super::foot::profile(),
            ProfileKind::Wheelchair => super::wheelchair::profile(),
            ProfileKind::RegularBike => super::bike::regular_profile(),
            ProfileKind::MountainBike => super::bike::mountain_profile(),
            ProfileKind::RoadBike => super::bike::road_profile(),
        }
    }
}
