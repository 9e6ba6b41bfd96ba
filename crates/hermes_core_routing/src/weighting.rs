use std::fmt;

use serde::Deserialize;

use crate::{
    constants::{DISTANCE_INFLUENCE, MAX_DURATION, MAX_WEIGHT},
    edge_direction::EdgeDirection,
    graph::{EdgeRecord, GraphEdge},
    profiles::{EdgeFlags, Profile},
};

pub type Weight = u32;
pub type Milliseconds = u32;

pub trait Weighting: Send + Sync {
    /// Unique name, `<profile>_<kind>`.
    fn name(&self) -> &str;

    /// Index of the flags word the weighting reads on every edge.
    fn profile_slot(&self) -> usize;

    fn can_access_edge(&self, edge: &EdgeRecord) -> bool {
        self.calc_edge_weight(edge, EdgeDirection::Forward) != MAX_WEIGHT
            || self.calc_edge_weight(edge, EdgeDirection::Backward) != MAX_WEIGHT
    }

    fn calc_edge_weight(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Weight;
    fn calc_edge_ms(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Milliseconds;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightingKind {
    Fastest,
    Shortest,
    Recommended,
}

impl WeightingKind {
    pub const ALL: [WeightingKind; 3] = [
        WeightingKind::Fastest,
        WeightingKind::Shortest,
        WeightingKind::Recommended,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeightingKind::Fastest => "fastest",
            WeightingKind::Shortest => "shortest",
            WeightingKind::Recommended => "recommended",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        WeightingKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
    }
}

impl fmt::Display for WeightingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn weighting_name(profile: &Profile, kind: WeightingKind) -> String {
    format!("{}_{}", profile.name(), kind)
}

pub fn create_weighting(kind: WeightingKind, profile: &Profile, slot: usize) -> Box<dyn Weighting> {
    let fastest = FastestWeighting::new(profile, slot);
    match kind {
        WeightingKind::Fastest => Box::new(fastest),
        WeightingKind::Shortest => Box::new(ShortestWeighting::new(profile, slot)),
        WeightingKind::Recommended => Box::new(RecommendedWeighting::new(profile, fastest)),
    }
}

/// Reads the flags of `edge` for `slot`.
fn decode_flags(edge: &EdgeRecord, slot: usize, speed_factor: f64) -> EdgeFlags {
    EdgeFlags::decode(edge.flags(slot), speed_factor)
}

fn travel_ms(edge: &EdgeRecord, speed: f64) -> Milliseconds {
    let speed_meters_per_second = speed / 3.6;
    let ms = (edge.distance().value() / speed_meters_per_second) * 1000.0;

    (ms.round() as Milliseconds).min(MAX_DURATION - 1)
}

#[derive(Debug, Clone)]
pub struct FastestWeighting {
    name: String,
    slot: usize,
    speed_factor: f64,
}

impl FastestWeighting {
    pub fn new(profile: &Profile, slot: usize) -> Self {
        FastestWeighting {
            name: weighting_name(profile, WeightingKind::Fastest),
            slot,
            speed_factor: profile.speed_factor,
        }
    }

    fn speed(&self, edge: &EdgeRecord, direction: EdgeDirection) -> f64 {
        let flags = decode_flags(edge, self.slot, self.speed_factor);
        if !flags.access(direction) {
            return 0.0;
        }
        flags.speed(direction)
    }
}

impl Weighting for FastestWeighting {
    fn name(&self) -> &str {
        &self.name
    }

    fn profile_slot(&self) -> usize {
        self.slot
    }

    fn calc_edge_weight(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Weight {
        let ms = self.calc_edge_ms(edge, direction);

        if ms == MAX_DURATION {
            return MAX_WEIGHT;
        }

        let distance_costs = edge.distance().value() * DISTANCE_INFLUENCE;
        ((ms as f64 + distance_costs).round() as Weight).min(MAX_WEIGHT - 1)
    }

    fn calc_edge_ms(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Milliseconds {
        let speed = self.speed(edge, direction);
        if speed <= 0.0 {
            return MAX_DURATION;
        }

        travel_ms(edge, speed)
    }
}

#[derive(Debug, Clone)]
pub struct ShortestWeighting {
    name: String,
    fastest: FastestWeighting,
}

impl ShortestWeighting {
    pub fn new(profile: &Profile, slot: usize) -> Self {
        ShortestWeighting {
            name: weighting_name(profile, WeightingKind::Shortest),
            fastest: FastestWeighting::new(profile, slot),
        }
    }
}

impl Weighting for ShortestWeighting {
    fn name(&self) -> &str {
        &self.name
    }

    fn profile_slot(&self) -> usize {
        self.fastest.slot
    }

    fn calc_edge_weight(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Weight {
        if self.fastest.calc_edge_ms(edge, direction) == MAX_DURATION {
            return MAX_WEIGHT;
        }

        (edge.distance().value().round() as Weight).min(MAX_WEIGHT - 1)
    }

    fn calc_edge_ms(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Milliseconds {
        self.fastest.calc_edge_ms(edge, direction)
    }
}

/// Fastest weighting scaled by the encoded priority of the edge.
#[derive(Debug, Clone)]
pub struct RecommendedWeighting {
    name: String,
    fastest: FastestWeighting,
}

impl RecommendedWeighting {
    pub fn new(profile: &Profile, fastest: FastestWeighting) -> Self {
        RecommendedWeighting {
            name: weighting_name(profile, WeightingKind::Recommended),
            fastest,
        }
    }
}

impl Weighting for RecommendedWeighting {
    fn name(&self) -> &str {
        &self.name
    }

    fn profile_slot(&self) -> usize {
        self.fastest.slot
    }

    fn calc_edge_weight(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Weight {
        let weight = self.fastest.calc_edge_weight(edge, direction);
        if weight == MAX_WEIGHT {
            return MAX_WEIGHT;
        }

        let priority = decode_flags(edge, self.fastest.slot, self.fastest.speed_factor).priority;
        ((weight as f64 / priority.factor()).round() as Weight).min(MAX_WEIGHT - 1)
    }

    fn calc_edge_ms(&self, edge: &EdgeRecord, direction: EdgeDirection) -> Milliseconds {
        self.fastest.calc_edge_ms(edge, direction)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        distance::meters,
        geopoint::GeoPoint,
        profiles::{ProfileKind, priority::PriorityCode},
    };

    use super::*;

    fn edge(flags: EdgeFlags, factor: f64) -> EdgeRecord {
        EdgeRecord::new(
            0,
            1,
            meters!(1000),
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.009)],
            vec![flags.encode(factor)],
        )
    }

    fn oneway(speed: f64, priority: PriorityCode) -> EdgeFlags {
        EdgeFlags {
            forward_speed: speed,
            backward_speed: speed,
            forward_access: true,
            priority,
            ..EdgeFlags::default()
        }
    }

    #[test]
    fn fastest_should_add_distance_influence() {
        let car = Profile::for_kind(ProfileKind::Car);
        let weighting = FastestWeighting::new(&car, 0);
        let edge = edge(oneway(60.0, PriorityCode::Unchanged), car.speed_factor);

        assert_eq!(weighting.name(), "car_fastest");
        assert_eq!(weighting.calc_edge_ms(&edge, EdgeDirection::Forward), 60_000);
        assert_eq!(
            weighting.calc_edge_weight(&edge, EdgeDirection::Forward),
            60_000 + 50_000
        );
        assert_eq!(
            weighting.calc_edge_weight(&edge, EdgeDirection::Backward),
            MAX_WEIGHT
        );
        assert!(weighting.can_access_edge(&edge));
    }

    #[test]
    fn shortest_should_use_distance() {
        let car = Profile::for_kind(ProfileKind::Car);
        let weighting = ShortestWeighting::new(&car, 0);
        let edge = edge(oneway(60.0, PriorityCode::Unchanged), car.speed_factor);

        assert_eq!(weighting.calc_edge_weight(&edge, EdgeDirection::Forward), 1000);
        assert_eq!(
            weighting.calc_edge_weight(&edge, EdgeDirection::Backward),
            MAX_WEIGHT
        );
    }

    #[test]
    fn recommended_should_prefer_high_priorities() {
        let bike = Profile::for_kind(ProfileKind::RegularBike);
        let weighting = create_weighting(WeightingKind::Recommended, &bike, 0);

        let preferred = edge(oneway(18.0, PriorityCode::Best), bike.speed_factor);
        let avoided = edge(oneway(18.0, PriorityCode::AvoidAtAllCosts), bike.speed_factor);

        assert_eq!(weighting.name(), "bike_recommended");
        assert!(
            weighting.calc_edge_weight(&preferred, EdgeDirection::Forward)
                < weighting.calc_edge_weight(&avoided, EdgeDirection::Forward)
        );
        assert_eq!(
            weighting.calc_edge_ms(&preferred, EdgeDirection::Forward),
            weighting.calc_edge_ms(&avoided, EdgeDirection::Forward)
        );
    }

    #[test]
    fn edges_without_access_are_inaccessible() {
        let car = Profile::for_kind(ProfileKind::Car);
        let weighting = FastestWeighting::new(&car, 0);
        let edge = edge(EdgeFlags::default(), car.speed_factor);

        assert!(!weighting.can_access_edge(&edge));
    }

    #[test]
    fn should_parse_kind_names() {
        for kind in WeightingKind::ALL {
            assert_eq!(WeightingKind::from_name(kind.name()), Some(kind));
        }
        let kind: WeightingKind = serde_json::from_str("\"shortest\"").unwrap();
        assert_eq!(kind, WeightingKind::Shortest);
    }
}
