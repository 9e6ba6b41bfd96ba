use super::{
    car::{MOTOR_BLOCK_BARRIERS, MOTOR_PASS_BARRIERS},
    profile::{OnewayMode, Profile, ProfileKind},
    speed_config::SpeedConfig,
};

/// Emergency vehicles may also use fords and emergency access roads.
pub fn profile() -> Profile {
    Profile {
        kind: ProfileKind::Emergency,
        restrictions: &["emergency", "motor_vehicle", "vehicle", "access"],
        restricted_values: &["private", "no", "restricted", "military"],
        intended_values: &[
            "yes",
            "permissive",
            "destination",
            "designated",
            "emergency",
            "agricultural",
            "forestry",
            "delivery",
        ],
        pass_barriers: MOTOR_PASS_BARRIERS,
        block_barriers: MOTOR_BLOCK_BARRIERS,
        speeds: SpeedConfig::new(
            &[
                ("motorway", 130),
                ("motorway_link", 60),
                ("motorroad", 100),
                ("trunk", 120),
                ("trunk_link", 60),
                ("primary", 120),
                ("primary_link", 60),
                ("secondary", 100),
                ("secondary_link", 60),
                ("tertiary", 90),
                ("tertiary_link", 50),
                ("unclassified", 60),
                ("residential", 50),
                ("living_street", 20),
                ("service", 30),
                ("road", 30),
                ("track", 20),
            ],
            &[
                ("asphalt", -1),
                ("concrete", -1),
                ("paved", -1),
                ("compacted", 60),
                ("fine_gravel", 60),
                ("paving_stones", 50),
                ("gravel", 40),
                ("cobblestone", 30),
                ("unpaved", 30),
                ("ground", 30),
                ("dirt", 30),
                ("grass", 25),
                ("sand", 20),
                ("mud", 15),
            ],
            &[
                ("grade1", 40),
                ("grade2", 30),
                ("grade3", 25),
                ("grade4", 15),
                ("grade5", 10),
            ],
        ),
        speed_factor: 5.0,
        min_speed: 5.0,
        max_speed: 140.0,
        max_speed_keys: &["maxspeed"],
        max_speed_factor: 1.0,
        destination_speed: None,
        ferry_speed: Some(15.0),
        block_fords: false,
        turn_costs: false,
        max_track_grade_level: 5,
        min_max_width: Some(2.0),
        acceleration: None,
        residential_penalty: false,
        oneway: OnewayMode::Motor,
        non_highways: Vec::new(),
        rejections: Vec::new(),
        priority_rules: Vec::new(),
    }
}
