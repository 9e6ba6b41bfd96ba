use super::{
    acceleration::AccelerationModel,
    profile::{OnewayMode, Profile, ProfileKind, RejectRule},
    speed_config::SpeedConfig,
};

pub(crate) const MOTOR_RESTRICTED_VALUES: &[&str] = &[
    "private",
    "agricultural",
    "forestry",
    "no",
    "restricted",
    "delivery",
    "military",
    "emergency",
];
pub(crate) const MOTOR_INTENDED_VALUES: &[&str] = &["yes", "permissive", "destination"];
pub(crate) const MOTOR_PASS_BARRIERS: &[&str] = &[
    "gate",
    "lift_gate",
    "swing_gate",
    "toll_booth",
    "border_control",
    "cattle_grid",
];
pub(crate) const MOTOR_BLOCK_BARRIERS: &[&str] = &[
    "kissing_gate",
    "bollard",
    "stile",
    "turnstile",
    "cycle_barrier",
    "motorcycle_barrier",
    "block",
    "fence",
];

pub(crate) const MOTOR_SURFACE_SPEEDS: &[(&str, i32)] = &[
    ("asphalt", -1),
    ("concrete", -1),
    ("concrete:plates", -1),
    ("concrete:lanes", -1),
    ("paved", -1),
    ("cement", 80),
    ("compacted", 60),
    ("fine_gravel", 60),
    ("paving_stones", 40),
    ("metal", 40),
    ("bricks", 40),
    ("grass", 30),
    ("wood", 30),
    ("sett", 30),
    ("grass_paver", 30),
    ("gravel", 30),
    ("unpaved", 30),
    ("ground", 30),
    ("dirt", 30),
    ("pebblestone", 30),
    ("tartan", 30),
    ("cobblestone", 20),
    ("clay", 20),
    ("earth", 15),
    ("stone", 15),
    ("rocky", 15),
    ("sand", 15),
    ("mud", 10),
];

pub fn profile() -> Profile {
    Profile {
        kind: ProfileKind::Car,
        restrictions: &["motorcar", "motor_vehicle", "vehicle", "access"],
        restricted_values: MOTOR_RESTRICTED_VALUES,
        intended_values: MOTOR_INTENDED_VALUES,
        pass_barriers: MOTOR_PASS_BARRIERS,
        block_barriers: MOTOR_BLOCK_BARRIERS,
        speeds: SpeedConfig::new(
            &[
                ("motorway", 100),
                ("motorway_link", 60),
                ("motorroad", 90),
                ("trunk", 85),
                ("trunk_link", 60),
                ("primary", 65),
                ("primary_link", 50),
                ("secondary", 60),
                ("secondary_link", 50),
                ("tertiary", 50),
                ("tertiary_link", 40),
                ("unclassified", 30),
                ("residential", 30),
                ("living_street", 10),
                ("service", 20),
                ("road", 20),
                ("track", 15),
            ],
            MOTOR_SURFACE_SPEEDS,
            &[
                ("grade1", 40),
                ("grade2", 30),
                ("grade3", 20),
                ("grade4", 15),
                ("grade5", 10),
            ],
        ),
        speed_factor: 5.0,
        min_speed: 5.0,
        max_speed: 140.0,
        max_speed_keys: &["maxspeed:motorcar", "maxspeed"],
        max_speed_factor: 0.9,
        destination_speed: Some(5.0),
        ferry_speed: Some(15.0),
        block_fords: true,
        turn_costs: false,
        max_track_grade_level: 3,
        min_max_width: Some(2.0),
        acceleration: Some(AccelerationModel::default()),
        residential_penalty: true,
        oneway: OnewayMode::Motor,
        non_highways: Vec::new(),
        rejections: vec![
            RejectRule {
                key: "service",
                values: &["emergency_access"],
            },
            RejectRule {
                key: "area",
                values: &["yes"],
            },
        ],
        priority_rules: Vec::new(),
    }
}
