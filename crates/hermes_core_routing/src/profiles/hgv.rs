use super::{
    acceleration::AccelerationModel,
    car::{MOTOR_BLOCK_BARRIERS, MOTOR_PASS_BARRIERS, MOTOR_SURFACE_SPEEDS},
    priority::{PriorityCode, PriorityRule},
    profile::{OnewayMode, Profile, ProfileKind, RejectRule},
    speed_config::SpeedConfig,
};

pub fn profile() -> Profile {
    Profile {
        kind: ProfileKind::HeavyVehicle,
        restrictions: &["hgv", "goods", "motor_vehicle", "vehicle", "access"],
        restricted_values: &["private", "no", "restricted", "military", "emergency"],
        intended_values: &[
            "yes",
            "permissive",
            "destination",
            "designated",
            "delivery",
            "agricultural",
            "forestry",
        ],
        pass_barriers: MOTOR_PASS_BARRIERS,
        block_barriers: MOTOR_BLOCK_BARRIERS,
        speeds: SpeedConfig::new(
            &[
                ("motorway", 80),
                ("motorway_link", 50),
                ("motorroad", 80),
                ("trunk", 80),
                ("trunk_link", 50),
                ("primary", 60),
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
            &[("grade1", 30), ("grade2", 20)],
        ),
        speed_factor: 5.0,
        min_speed: 5.0,
        max_speed: 90.0,
        max_speed_keys: &["maxspeed:hgv", "maxspeed"],
        max_speed_factor: 0.9,
        destination_speed: Some(5.0),
        ferry_speed: Some(15.0),
        block_fords: true,
        turn_costs: false,
        max_track_grade_level: 1,
        min_max_width: Some(2.0),
        acceleration: Some(AccelerationModel::new(15.0)),
        residential_penalty: true,
        oneway: OnewayMode::Motor,
        non_highways: Vec::new(),
        rejections: vec![RejectRule {
            key: "service",
            values: &["emergency_access"],
        }],
        priority_rules: vec![
            PriorityRule::Class {
                weight: 100,
                classes: &[
                    ("motorway", PriorityCode::Best),
                    ("motorway_link", PriorityCode::Best),
                    ("trunk", PriorityCode::Best),
                    ("trunk_link", PriorityCode::Best),
                    ("primary", PriorityCode::Prefer),
                    ("primary_link", PriorityCode::Prefer),
                    ("secondary", PriorityCode::Prefer),
                    ("secondary_link", PriorityCode::Prefer),
                    ("tertiary", PriorityCode::Unchanged),
                    ("tertiary_link", PriorityCode::Unchanged),
                    ("residential", PriorityCode::AvoidIfPossible),
                    ("living_street", PriorityCode::AvoidIfPossible),
                    ("service", PriorityCode::AvoidIfPossible),
                    ("track", PriorityCode::AvoidAtAllCosts),
                ],
            },
            PriorityRule::Tag {
                weight: 120,
                key: "hgv",
                values: &["designated"],
                code: PriorityCode::Best,
            },
            PriorityRule::Tag {
                weight: 110,
                key: "hgv",
                values: &["destination", "delivery"],
                code: PriorityCode::ReachDest,
            },
            PriorityRule::Tag {
                weight: 40,
                key: "tunnel",
                values: &["yes"],
                code: PriorityCode::AvoidIfPossible,
            },
        ],
    }
}
