use tracing::trace;

use crate::{
    constants::MAX_NODE_COUNTER,
    error::{ConfigurationError, DataAnomaly, EncoderError},
};

use super::{
    edge_flags::{EdgeFlags, quantize_speed},
    max_speed::{MaxSpeed, parse_max_speed},
    priority::PriorityCandidates,
    profile::{OnewayMode, Profile},
    tags::{RawNode, RawWay, Tags},
    way_attributes::{parse_length, track_grade},
};

static ONEWAYS: [&str; 4] = ["yes", "true", "1", "-1"];
static FERRY_ROUTES: [&str; 2] = ["ferry", "shuttle_train"];

const RESIDENTIAL_NODE_SPACING_METERS: f64 = 100.0;
const RESIDENTIAL_PENALTY: f64 = 0.5;
const ROUNDABOUT_SPEED: f64 = 35.0;
const MULTI_LANE_ROUNDABOUT_SPEED: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NoHighway,
    UnknownHighway(String),
    Impassable,
    TrackGrade(u8),
    Ford,
    MaxWidth,
    /// The restriction key whose value forbids access.
    Restricted(&'static str),
    ProfileRule(&'static str),
    NoAccess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EncodedWay {
    Reject(RejectReason),
    Accept(EdgeFlags),
}

impl EncodedWay {
    pub fn flags(&self) -> Option<&EdgeFlags> {
        match self {
            EncodedWay::Accept(flags) => Some(flags),
            EncodedWay::Reject(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierAccess {
    Pass,
    Block,
}

/// Decision of the first restriction key present on a way or a node.
enum Restriction {
    Unrestricted,
    Intended(&'static str),
    Restricted(&'static str),
}

/// Turns the tags of a way into edge flags for one profile.
#[derive(Debug, Clone)]
pub struct ProfileEncoder {
    profile: Profile,
}

impl ProfileEncoder {
    pub fn new(profile: Profile) -> Result<Self, ConfigurationError> {
        profile.validate()?;
        Ok(ProfileEncoder { profile })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn name(&self) -> &'static str {
        self.profile.name()
    }

    pub fn encode(&self, way: &RawWay) -> Result<EncodedWay, EncoderError> {
        if way.nodes.len() < 2 {
            return Err(DataAnomaly::TooFewNodes {
                way: way.id,
                count: way.nodes.len(),
            }
            .into());
        }

        let tags = &way.tags;

        let Some(highway) = tags.tag("highway") else {
            return self.encode_non_highway(way);
        };

        let class = self.resolve_class(tags, highway);
        if !self.profile.speeds.has_class(class) {
            return Ok(EncodedWay::Reject(RejectReason::UnknownHighway(
                class.to_string(),
            )));
        }

        if let Some(reason) = self.rejection(tags) {
            trace!(way = way.id, profile = self.name(), ?reason, "rejected way");
            return Ok(EncodedWay::Reject(reason));
        }

        let conditional_access = match self.restriction(tags) {
            Restriction::Restricted(key) => {
                if self.has_conditional_access(tags, key) {
                    true
                } else {
                    return Ok(EncodedWay::Reject(RejectReason::Restricted(key)));
                }
            }
            _ => false,
        };

        let (speed, way_speed) = self.resolve_speed(way, class)?;
        let (forward_access, backward_access) = self.oneway_access(tags);

        if !forward_access && !backward_access {
            return Ok(EncodedWay::Reject(RejectReason::NoAccess));
        }

        Ok(EncodedWay::Accept(EdgeFlags {
            forward_speed: speed,
            backward_speed: speed,
            forward_access,
            backward_access,
            conditional_access,
            priority: self.priority(way, class, way_speed),
            roundabout: is_roundabout(tags),
            ferry: false,
            ..EdgeFlags::default()
        }))
    }

    fn encode_non_highway(&self, way: &RawWay) -> Result<EncodedWay, EncoderError> {
        let tags = &way.tags;

        if tags.has_tag_in("route", &FERRY_ROUTES) {
            return Ok(self.encode_ferry(way)?);
        }

        let Some(non_highway) = self
            .profile
            .non_highways
            .iter()
            .find(|non_highway| tags.has_tag(non_highway.key, non_highway.value))
        else {
            return Ok(EncodedWay::Reject(RejectReason::NoHighway));
        };

        if !self.profile.speeds.has_class(non_highway.class) {
            return Err(ConfigurationError::UnknownHighwayClass {
                profile: self.name().to_string(),
                class: non_highway.class.to_string(),
            }
            .into());
        }

        if let Restriction::Restricted(key) = self.restriction(tags) {
            return Ok(EncodedWay::Reject(RejectReason::Restricted(key)));
        }

        let (speed, way_speed) = self.resolve_speed(way, non_highway.class)?;

        Ok(EncodedWay::Accept(EdgeFlags {
            forward_speed: speed,
            backward_speed: speed,
            forward_access: true,
            backward_access: true,
            priority: self.priority(way, non_highway.class, way_speed),
            ..EdgeFlags::default()
        }))
    }

    // https://wiki.openstreetmap.org/wiki/Tag:route%3Dferry
    fn encode_ferry(&self, way: &RawWay) -> Result<EncodedWay, DataAnomaly> {
        let Some(ferry_speed) = self.profile.ferry_speed else {
            return Ok(EncodedWay::Reject(RejectReason::NoHighway));
        };

        if let Restriction::Restricted(key) = self.restriction(&way.tags) {
            return Ok(EncodedWay::Reject(RejectReason::Restricted(key)));
        }

        let duration = match way.tag("duration") {
            Some(value) => Some(parse_duration_hours(value).ok_or_else(|| {
                DataAnomaly::InvalidTag {
                    way: way.id,
                    key: "duration",
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        let speed = match (duration, way.estimated_distance()) {
            (Some(hours), Some(distance)) if hours > 0.0 => distance.value() / 1000.0 / hours,
            _ => ferry_speed,
        };

        Ok(EncodedWay::Accept(EdgeFlags {
            forward_speed: self.finalize_speed(speed),
            backward_speed: self.finalize_speed(speed),
            forward_access: true,
            backward_access: true,
            ferry: true,
            priority: self.priority(way, "ferry", speed),
            ..EdgeFlags::default()
        }))
    }

    fn resolve_class<'a>(&self, tags: &Tags, highway: &'a str) -> &'a str {
        // https://wiki.openstreetmap.org/wiki/Key:motorroad
        if tags.has_tag("motorroad", "yes") && self.profile.speeds.has_class("motorroad") {
            return "motorroad";
        }
        highway
    }

    fn rejection(&self, tags: &Tags) -> Option<RejectReason> {
        if tags.has_tag("impassable", "yes")
            || tags.has_tag("status", "impassable")
            || tags.has_tag("smoothness", "impassable")
        {
            return Some(RejectReason::Impassable);
        }

        // https://wiki.openstreetmap.org/wiki/Key:tracktype
        let grade = tags.tag("tracktype").map_or(0, track_grade);
        if grade > self.profile.max_track_grade_level {
            return Some(RejectReason::TrackGrade(grade));
        }

        if self.profile.block_fords && is_ford(tags) {
            return Some(RejectReason::Ford);
        }

        if let Some(min_max_width) = self.profile.min_max_width
            && tags
                .tag("maxwidth")
                .and_then(parse_length)
                .is_some_and(|width| width < min_max_width)
        {
            return Some(RejectReason::MaxWidth);
        }

        self.profile
            .rejections
            .iter()
            .find(|rule| tags.has_tag_in(rule.key, rule.values))
            .map(|rule| RejectReason::ProfileRule(rule.key))
    }

    fn restriction(&self, tags: &Tags) -> Restriction {
        let Some((key, value)) = self
            .profile
            .restrictions
            .iter()
            .find_map(|key| tags.tag(key).map(|value| (*key, value)))
        else {
            return Restriction::Unrestricted;
        };

        if self.profile.restricted_values.contains(&value) {
            Restriction::Restricted(key)
        } else if self.profile.intended_values.contains(&value) {
            Restriction::Intended(key)
        } else {
            Restriction::Unrestricted
        }
    }

    // https://wiki.openstreetmap.org/wiki/Conditional_restrictions
    fn has_conditional_access(&self, tags: &Tags, key: &str) -> bool {
        tags.tag(&format!("{key}:conditional"))
            .and_then(|value| value.split('@').next())
            .is_some_and(|value| self.profile.intended_values.contains(&value.trim()))
    }

    fn explicit_max_speed(&self, tags: &Tags) -> Option<MaxSpeed> {
        self.profile
            .max_speed_keys
            .iter()
            .filter_map(|key| tags.tag(key))
            .find_map(|value| parse_max_speed(value, &self.profile.speeds))
    }

    /// Returns the encoded speed and the speed used by the priority rules.
    fn resolve_speed(&self, way: &RawWay, class: &str) -> Result<(f64, f64), ConfigurationError> {
        let profile = &self.profile;
        let tags = &way.tags;

        let class_speed = profile.speeds.class_speed(class).ok_or_else(|| {
            ConfigurationError::UnknownHighwayClass {
                profile: self.name().to_string(),
                class: class.to_string(),
            }
        })?;

        let mut speed = match self.explicit_max_speed(tags) {
            Some(MaxSpeed::Limited(max_speed)) => {
                (max_speed * profile.max_speed_factor).min(profile.max_speed)
            }
            Some(MaxSpeed::Unlimited) => profile.max_speed,
            None => class_speed,
        };

        // Speed of the road itself, pedestrians avoid fast roads even though
        // their own speed does not depend on it.
        let way_speed = match self
            .explicit_max_speed(tags)
            .or_else(|| tags.tag("maxspeed").and_then(|value| parse_max_speed(value, &profile.speeds)))
        {
            Some(MaxSpeed::Limited(max_speed)) => max_speed,
            Some(MaxSpeed::Unlimited) => f64::MAX,
            None => class_speed,
        };

        // Track grades only slow tracks down
        if class == "track"
            && let Some(track_speed) = tags
                .tag("tracktype")
                .and_then(|tracktype| profile.speeds.tracktype_speed(tracktype))
        {
            speed = speed.min(track_speed);
        }

        if let Some(surface_speed) = tags
            .tag("surface")
            .and_then(|surface| profile.speeds.surface_speed(surface))
        {
            speed = speed.min(surface_speed);
        }

        let distance = way.estimated_distance().map(|distance| distance.value());
        if class == "residential" && profile.residential_penalty {
            let spacing = distance.map(|distance| distance / (way.nodes.len() - 1) as f64);
            if spacing.is_some_and(|spacing| spacing < RESIDENTIAL_NODE_SPACING_METERS) {
                speed *= RESIDENTIAL_PENALTY;
            }
        } else if let (Some(model), Some(distance)) = (&profile.acceleration, distance) {
            speed = model.adjust_speed(distance, speed);
        }

        // https://wiki.openstreetmap.org/wiki/Key:junction
        if is_roundabout(tags) {
            let lanes = tags.parse_f64("lanes").unwrap_or(1.0);
            let cap = if lanes >= 2.0 {
                MULTI_LANE_ROUNDABOUT_SPEED
            } else {
                ROUNDABOUT_SPEED
            };
            speed = speed.min(cap);
        }

        if let Some(destination_speed) = profile.destination_speed
            && tags.any_tag_in(profile.restrictions, &["destination"])
        {
            speed = destination_speed;
        }

        Ok((self.finalize_speed(speed), way_speed))
    }

    fn finalize_speed(&self, speed: f64) -> f64 {
        let profile = &self.profile;
        let speed = speed.clamp(profile.min_speed, profile.max_speed);
        quantize_speed(speed, profile.speed_factor)
    }

    fn priority(&self, way: &RawWay, class: &str, way_speed: f64) -> super::priority::PriorityCode {
        let mut candidates = PriorityCandidates::new();
        for rule in &self.profile.priority_rules {
            rule.evaluate(way, class, way_speed, &mut candidates);
        }
        candidates.resolve()
    }

    // https://wiki.openstreetmap.org/wiki/Key:oneway
    fn oneway_access(&self, tags: &Tags) -> (bool, bool) {
        match self.profile.oneway {
            OnewayMode::Motor => {
                if tags.any_tag_in(&["vehicle:forward", "motor_vehicle:forward"], &["no"]) {
                    return (false, true);
                }
                if tags.any_tag_in(&["vehicle:backward", "motor_vehicle:backward"], &["no"]) {
                    return (true, false);
                }
                oneway_from_tag(tags.tag("oneway"), is_roundabout(tags))
            }
            OnewayMode::Bike => {
                // https://wiki.openstreetmap.org/wiki/Key:oneway:bicycle
                if tags.has_tag("oneway:bicycle", "no")
                    || tags
                        .tag("cycleway")
                        .is_some_and(|cycleway| cycleway.starts_with("opposite"))
                {
                    return (true, true);
                }
                let oneway = tags.tag("oneway:bicycle").or_else(|| tags.tag("oneway"));
                oneway_from_tag(oneway, is_roundabout(tags))
            }
            OnewayMode::Foot => oneway_from_tag(tags.tag("oneway:foot"), false),
        }
    }

    // https://wiki.openstreetmap.org/wiki/Key:barrier
    pub fn barrier_access(&self, node: &RawNode) -> BarrierAccess {
        let tags = &node.tags;

        if self.profile.block_fords && is_ford(tags) {
            return BarrierAccess::Block;
        }

        let Some(barrier) = tags.tag("barrier") else {
            return BarrierAccess::Pass;
        };

        let block_by_default = self.profile.block_barriers.contains(&barrier);
        if !block_by_default && !self.profile.pass_barriers.contains(&barrier) {
            // Barrier kinds the profile does not know never stop it
            return BarrierAccess::Pass;
        }

        if tags.has_tag("locked", "yes") {
            return BarrierAccess::Block;
        }

        match self.restriction(tags) {
            Restriction::Intended(_) => BarrierAccess::Pass,
            Restriction::Restricted(_) => BarrierAccess::Block,
            Restriction::Unrestricted if block_by_default => BarrierAccess::Block,
            Restriction::Unrestricted => BarrierAccess::Pass,
        }
    }

    /// Traffic signals and crossings found on `nodes`, both saturating.
    pub fn node_counters<'a>(&self, nodes: impl IntoIterator<Item = &'a RawNode>) -> (u8, u8) {
        nodes
            .into_iter()
            .fold((0u8, 0u8), |(signals, crossings), node| {
                let tags = &node.tags;
                let is_signal = tags.has_tag("highway", "traffic_signals");
                let is_crossing =
                    tags.has_tag("highway", "crossing") || tags.has_tag("railway", "level_crossing");

                (
                    (signals + is_signal as u8).min(MAX_NODE_COUNTER),
                    (crossings + is_crossing as u8).min(MAX_NODE_COUNTER),
                )
            })
    }
}

fn is_roundabout(tags: &Tags) -> bool {
    tags.has_tag_in("junction", &["roundabout", "circular"])
}

fn is_ford(tags: &Tags) -> bool {
    tags.has_tag("ford", "yes") || tags.has_tag("highway", "ford")
}

fn oneway_from_tag(oneway: Option<&str>, implied: bool) -> (bool, bool) {
    match oneway {
        Some("-1") => (false, true),
        Some(value) if ONEWAYS.contains(&value) => (true, false),
        Some("no") => (true, true),
        _ if implied => (true, false),
        _ => (true, true),
    }
}

/// Ferry duration in hours, from minutes, `HH:MM` or `HH:MM:SS`.
fn parse_duration_hours(value: &str) -> Option<f64> {
    let parts = value
        .trim()
        .split(':')
        .map(|part| part.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let hours = match parts.as_slice() {
        [minutes] => minutes / 60.0,
        [hours, minutes] => hours + minutes / 60.0,
        [hours, minutes, seconds] => hours + minutes / 60.0 + seconds / 3600.0,
        _ => return None,
    };

    Some(hours).filter(|hours| hours.is_finite() && *hours > 0.0)
}

#[cfg(test)]
mod tests {
    use crate::{
        geopoint::GeoPoint,
        profiles::{
            edge_flags::EdgeFlags,
            priority::PriorityCode,
            profile::{Profile, ProfileKind},
        },
    };

    use super::*;

    fn encoder(kind: ProfileKind) -> ProfileEncoder {
        ProfileEncoder::new(Profile::for_kind(kind)).unwrap()
    }

    fn way(tags: &[(&str, &str)]) -> RawWay {
        RawWay::new(1, vec![1, 2], tags.iter().copied().collect())
    }

    fn accepted(encoded: Result<EncodedWay, EncoderError>) -> EdgeFlags {
        match encoded {
            Ok(EncodedWay::Accept(flags)) => flags,
            other => panic!("expected an accepted way, got {other:?}"),
        }
    }

    #[test]
    fn car_residential_should_be_30() {
        let flags = accepted(encoder(ProfileKind::Car).encode(&way(&[("highway", "residential")])));

        assert_eq!(flags.forward_speed, 30.0);
        assert_eq!(flags.backward_speed, 30.0);
        assert!(flags.forward_access && flags.backward_access);
        assert!(!flags.ferry);
    }

    #[test]
    fn car_should_reject_grade4_tracks() {
        let encoded = encoder(ProfileKind::Car)
            .encode(&way(&[("highway", "track"), ("tracktype", "grade4")]))
            .unwrap();

        assert_eq!(encoded, EncodedWay::Reject(RejectReason::TrackGrade(4)));
    }

    #[test]
    fn tracktype_should_only_slow_down_tracks() {
        let car = encoder(ProfileKind::Car);

        let living_street = accepted(car.encode(&way(&[("highway", "living_street")])));
        let graded_street = accepted(
            car.encode(&way(&[("highway", "living_street"), ("tracktype", "grade1")])),
        );
        assert_eq!(graded_street.forward_speed, living_street.forward_speed);

        let track = accepted(car.encode(&way(&[("highway", "track")])));
        let smooth_track =
            accepted(car.encode(&way(&[("highway", "track"), ("tracktype", "grade1")])));
        assert_eq!(smooth_track.forward_speed, track.forward_speed);

        let emergency = encoder(ProfileKind::Emergency);
        let rough_track = accepted(
            emergency.encode(&way(&[("highway", "track"), ("tracktype", "grade5")])),
        );
        assert_eq!(rough_track.forward_speed, 10.0);
    }

    #[test]
    fn mud_surface_should_slow_down_to_10() {
        let flags = accepted(
            encoder(ProfileKind::Car).encode(&way(&[("highway", "residential"), ("surface", "mud")])),
        );

        assert_eq!(flags.forward_speed, 10.0);
    }

    #[test]
    fn should_apply_explicit_max_speed() {
        let flags = accepted(
            encoder(ProfileKind::Car).encode(&way(&[("highway", "primary"), ("maxspeed", "50")])),
        );
        assert_eq!(flags.forward_speed, 45.0);

        let flags = accepted(
            encoder(ProfileKind::HeavyVehicle).encode(&way(&[
                ("highway", "motorway"),
                ("maxspeed", "130"),
                ("maxspeed:hgv", "80"),
            ])),
        );
        assert_eq!(flags.forward_speed, 70.0);

        let flags = accepted(
            encoder(ProfileKind::Car).encode(&way(&[("highway", "motorway"), ("maxspeed", "none")])),
        );
        assert_eq!(flags.forward_speed, 140.0);
    }

    #[test]
    fn should_reject_unknown_and_missing_highways() {
        let car = encoder(ProfileKind::Car);

        assert_eq!(
            car.encode(&way(&[("highway", "footway")])).unwrap(),
            EncodedWay::Reject(RejectReason::UnknownHighway(String::from("footway")))
        );
        assert_eq!(
            car.encode(&way(&[("building", "yes")])).unwrap(),
            EncodedWay::Reject(RejectReason::NoHighway)
        );
        assert_eq!(
            encoder(ProfileKind::Foot)
                .encode(&way(&[("highway", "motorway")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::UnknownHighway(String::from("motorway")))
        );
    }

    #[test]
    fn should_reject_impassable_fords_and_narrow_ways() {
        let car = encoder(ProfileKind::Car);

        assert_eq!(
            car.encode(&way(&[("highway", "primary"), ("status", "impassable")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::Impassable)
        );
        assert_eq!(
            car.encode(&way(&[("highway", "primary"), ("ford", "yes")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::Ford)
        );
        assert_eq!(
            car.encode(&way(&[("highway", "service"), ("maxwidth", "1.8")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::MaxWidth)
        );
        assert_eq!(
            car.encode(&way(&[("highway", "service"), ("service", "emergency_access")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::ProfileRule("service"))
        );
        assert!(matches!(
            encoder(ProfileKind::Emergency).encode(&way(&[("highway", "primary"), ("ford", "yes")])),
            Ok(EncodedWay::Accept(_))
        ));
    }

    #[test]
    fn first_restriction_key_should_decide() {
        let car = encoder(ProfileKind::Car);

        assert_eq!(
            car.encode(&way(&[("highway", "primary"), ("access", "no")]))
                .unwrap(),
            EncodedWay::Reject(RejectReason::Restricted("access"))
        );

        let flags = accepted(car.encode(&way(&[
            ("highway", "primary"),
            ("access", "no"),
            ("motor_vehicle", "yes"),
        ])));
        assert!(!flags.conditional_access);
    }

    #[test]
    fn conditional_override_should_grant_access() {
        let flags = accepted(encoder(ProfileKind::Car).encode(&way(&[
            ("highway", "tertiary"),
            ("motor_vehicle", "no"),
            ("motor_vehicle:conditional", "yes @ (Mo-Fr 06:00-19:00)"),
        ])));

        assert!(flags.conditional_access);
        assert!(flags.has_access());
    }

    #[test]
    fn destination_access_should_use_destination_speed() {
        let flags = accepted(
            encoder(ProfileKind::Car)
                .encode(&way(&[("highway", "primary"), ("motor_vehicle", "destination")])),
        );

        assert_eq!(flags.forward_speed, 5.0);
    }

    #[test]
    fn should_cap_roundabouts() {
        let flags = accepted(
            encoder(ProfileKind::Car)
                .encode(&way(&[("highway", "primary"), ("junction", "roundabout")])),
        );
        assert!(flags.roundabout);
        assert_eq!(flags.forward_speed, 35.0);
        assert!(flags.forward_access && !flags.backward_access);

        let flags = accepted(encoder(ProfileKind::Car).encode(&way(&[
            ("highway", "primary"),
            ("junction", "roundabout"),
            ("lanes", "2"),
        ])));
        assert_eq!(flags.forward_speed, 40.0);
    }

    #[test]
    fn should_halve_densely_noded_residential_ways() {
        let way = RawWay::new(1, vec![1, 2, 3], [("highway", "residential")].into_iter().collect())
            .with_geometry(vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 0.00045),
                GeoPoint::new(0.0, 0.0009),
            ]);

        let flags = accepted(encoder(ProfileKind::Car).encode(&way));
        assert_eq!(flags.forward_speed, 15.0);
    }

    #[test]
    fn short_ways_should_be_derated_by_acceleration() {
        let way = RawWay::new(1, vec![1, 2], [("highway", "primary")].into_iter().collect())
            .with_geometry(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0018)]);

        let flags = accepted(encoder(ProfileKind::Car).encode(&way));
        assert!(flags.forward_speed < 65.0, "{}", flags.forward_speed);
        assert!(flags.forward_speed >= 5.0);
    }

    #[test]
    fn should_handle_oneways_per_profile() {
        let oneway = way(&[("highway", "residential"), ("oneway", "yes")]);
        let reversed = way(&[("highway", "residential"), ("oneway", "-1")]);

        let flags = accepted(encoder(ProfileKind::Car).encode(&oneway));
        assert!(flags.forward_access && !flags.backward_access);

        let flags = accepted(encoder(ProfileKind::Car).encode(&reversed));
        assert!(!flags.forward_access && flags.backward_access);

        let flags = accepted(encoder(ProfileKind::Foot).encode(&oneway));
        assert!(flags.forward_access && flags.backward_access);

        let flags = accepted(encoder(ProfileKind::RegularBike).encode(&oneway));
        assert!(flags.forward_access && !flags.backward_access);

        let contraflow = way(&[
            ("highway", "residential"),
            ("oneway", "yes"),
            ("oneway:bicycle", "no"),
        ]);
        let flags = accepted(encoder(ProfileKind::RegularBike).encode(&contraflow));
        assert!(flags.forward_access && flags.backward_access);
    }

    #[test]
    fn should_encode_ferries() {
        let ferry = RawWay::new(
            7,
            vec![1, 2],
            [("route", "ferry"), ("duration", "00:30")].into_iter().collect(),
        )
        .with_geometry(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.09)]);

        let flags = accepted(encoder(ProfileKind::Car).encode(&ferry));
        assert!(flags.ferry);
        // 10 km in half an hour
        assert_eq!(flags.forward_speed, 20.0);

        let flags = accepted(encoder(ProfileKind::Foot).encode(&way(&[("route", "ferry")])));
        assert_eq!(flags.forward_speed, 15.0);

        let broken = way(&[("route", "ferry"), ("duration", "soon")]);
        assert!(matches!(
            encoder(ProfileKind::Car).encode(&broken),
            Err(EncoderError::Anomaly(DataAnomaly::InvalidTag { key: "duration", .. }))
        ));
    }

    #[test]
    fn pedestrians_should_use_platforms() {
        let platform = way(&[("railway", "platform")]);

        assert!(matches!(
            encoder(ProfileKind::Foot).encode(&platform),
            Ok(EncodedWay::Accept(_))
        ));
        assert_eq!(
            encoder(ProfileKind::Car).encode(&platform).unwrap(),
            EncodedWay::Reject(RejectReason::NoHighway)
        );
    }

    #[test]
    fn unmapped_non_highway_class_should_be_a_configuration_error() {
        let mut profile = Profile::for_kind(ProfileKind::Foot);
        profile.speeds.default.remove("pier");
        let encoder = ProfileEncoder::new(profile).unwrap();

        assert!(matches!(
            encoder.encode(&way(&[("man_made", "pier")])),
            Err(EncoderError::Configuration(
                ConfigurationError::UnknownHighwayClass { .. }
            ))
        ));
    }

    #[test]
    fn ways_with_a_single_node_are_anomalies() {
        let way = RawWay::new(3, vec![1], [("highway", "primary")].into_iter().collect());

        assert_eq!(
            encoder(ProfileKind::Car).encode(&way),
            Err(EncoderError::Anomaly(DataAnomaly::TooFewNodes { way: 3, count: 1 }))
        );
    }

    #[test]
    fn speeds_should_stay_within_profile_bounds() {
        let samples: &[&[(&str, &str)]] = &[
            &[("highway", "motorway")],
            &[("highway", "motorway"), ("maxspeed", "300")],
            &[("highway", "primary"), ("maxspeed", "3")],
            &[("highway", "residential"), ("surface", "sand")],
            &[("highway", "track"), ("tracktype", "grade1")],
            &[("highway", "footway")],
            &[("highway", "cycleway"), ("maxspeed", "walk")],
            &[("highway", "path"), ("surface", "gravel")],
            &[("highway", "steps")],
            &[("highway", "living_street"), ("maxspeed", "20 mph")],
            &[("route", "ferry")],
        ];

        for kind in ProfileKind::ALL {
            let encoder = encoder(kind);
            let profile = encoder.profile();

            for sample in samples {
                if let Ok(EncodedWay::Accept(flags)) = encoder.encode(&way(sample)) {
                    for speed in [flags.forward_speed, flags.backward_speed] {
                        assert!(
                            speed >= profile.min_speed && speed <= profile.max_speed,
                            "{kind} {sample:?} gave {speed}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn encoding_twice_should_give_identical_bits() {
        let way = way(&[
            ("highway", "secondary"),
            ("maxspeed", "70"),
            ("surface", "compacted"),
            ("oneway", "yes"),
        ]);

        for kind in ProfileKind::ALL {
            let encoder = encoder(kind);
            let factor = encoder.profile().speed_factor;
            let first = encoder.encode(&way).unwrap();
            let second = encoder.encode(&way).unwrap();

            assert_eq!(first, second);
            if let (Some(first), Some(second)) = (first.flags(), second.flags()) {
                assert_eq!(first.encode(factor), second.encode(factor));
            }
        }
    }

    #[test]
    fn should_resolve_priority_from_rules() {
        let flags = accepted(
            encoder(ProfileKind::Foot)
                .encode(&way(&[("highway", "footway"), ("foot", "designated")])),
        );
        assert!(flags.priority > PriorityCode::Unchanged);

        let flags = accepted(encoder(ProfileKind::Car).encode(&way(&[("highway", "primary")])));
        assert_eq!(flags.priority, PriorityCode::Unchanged);

        let flags = accepted(encoder(ProfileKind::Foot).encode(&way(&[
            ("highway", "residential"),
            ("maxspeed", "70"),
        ])));
        assert_eq!(flags.priority, PriorityCode::AvoidIfPossible);
    }

    #[test]
    fn should_block_barriers() {
        let car = encoder(ProfileKind::Car);
        let foot = encoder(ProfileKind::Foot);
        let bollard = RawNode::new(1, GeoPoint::new(0.0, 0.0))
            .with_tags([("barrier", "bollard")].into_iter().collect());
        let private_gate = RawNode::new(2, GeoPoint::new(0.0, 0.0))
            .with_tags([("barrier", "gate"), ("access", "private")].into_iter().collect());
        let open_bollard = RawNode::new(3, GeoPoint::new(0.0, 0.0)).with_tags(
            [("barrier", "bollard"), ("motor_vehicle", "yes")]
                .into_iter()
                .collect(),
        );

        assert_eq!(car.barrier_access(&bollard), BarrierAccess::Block);
        assert_eq!(foot.barrier_access(&bollard), BarrierAccess::Pass);
        assert_eq!(car.barrier_access(&private_gate), BarrierAccess::Block);
        assert_eq!(car.barrier_access(&open_bollard), BarrierAccess::Pass);
    }

    #[test]
    fn pass_by_default_barriers_should_honour_locks_and_access() {
        let car = encoder(ProfileKind::Car);
        let node = |tags: &[(&str, &str)]| {
            RawNode::new(1, GeoPoint::new(0.0, 0.0)).with_tags(tags.iter().copied().collect())
        };

        assert_eq!(car.barrier_access(&node(&[("barrier", "gate")])), BarrierAccess::Pass);
        assert_eq!(
            car.barrier_access(&node(&[("barrier", "gate"), ("locked", "yes")])),
            BarrierAccess::Block
        );
        assert_eq!(
            car.barrier_access(&node(&[("barrier", "lift_gate"), ("motor_vehicle", "no")])),
            BarrierAccess::Block
        );
        // A lock wins over an access tag
        assert_eq!(
            car.barrier_access(&node(&[
                ("barrier", "gate"),
                ("locked", "yes"),
                ("access", "yes")
            ])),
            BarrierAccess::Block
        );

        // Unknown barrier kinds are ignored, whatever their access tags
        assert_eq!(
            car.barrier_access(&node(&[("barrier", "entrance"), ("access", "no")])),
            BarrierAccess::Pass
        );
    }

    #[test]
    fn should_count_signals_and_crossings() {
        let signal = RawNode::new(1, GeoPoint::new(0.0, 0.0))
            .with_tags([("highway", "traffic_signals")].into_iter().collect());
        let crossing = RawNode::new(2, GeoPoint::new(0.0, 0.0))
            .with_tags([("railway", "level_crossing")].into_iter().collect());

        let car = encoder(ProfileKind::Car);
        assert_eq!(car.node_counters([&signal, &crossing, &signal]), (2, 1));

        let many = vec![&signal; 40];
        assert_eq!(car.node_counters(many), (MAX_NODE_COUNTER, 0));
    }
}
