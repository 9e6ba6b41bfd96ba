use super::{
    foot::{PEDESTRIAN_PASS_BARRIERS, PEDESTRIAN_RESTRICTED_VALUES, pedestrian_non_highways},
    priority::{PriorityCode, PriorityRule},
    profile::{OnewayMode, Profile, ProfileKind},
    speed_config::SpeedConfig,
};

pub fn profile() -> Profile {
    Profile {
        kind: ProfileKind::Wheelchair,
        restrictions: &["wheelchair", "foot", "access"],
        restricted_values: PEDESTRIAN_RESTRICTED_VALUES,
        intended_values: &["yes", "designated", "official", "permissive", "limited"],
        pass_barriers: &["gate", "lift_gate", "swing_gate", "bollard", "border_control"],
        block_barriers: &[
            "kissing_gate",
            "stile",
            "turnstile",
            "cycle_barrier",
            "motorcycle_barrier",
            "block",
            "fence",
            "wall",
            "cattle_grid",
        ],
        speeds: SpeedConfig::new(
            &[
                ("footway", 5),
                ("pedestrian", 5),
                ("living_street", 4),
                ("residential", 4),
                ("service", 4),
                ("unclassified", 4),
                ("road", 4),
                ("path", 4),
                ("cycleway", 4),
                ("track", 3),
                ("tertiary", 3),
                ("tertiary_link", 3),
                ("secondary", 3),
                ("secondary_link", 3),
                ("primary", 3),
                ("primary_link", 3),
                ("platform", 4),
                ("pier", 4),
            ],
            &[
                ("asphalt", -1),
                ("concrete", -1),
                ("paved", -1),
                ("paving_stones", 4),
                ("compacted", 3),
                ("fine_gravel", 3),
                ("sett", 2),
                ("cobblestone", 2),
                ("gravel", 2),
                ("ground", 2),
                ("dirt", 2),
                ("grass", 1),
                ("sand", 1),
                ("mud", 1),
            ],
            &[("grade1", 4)],
        ),
        speed_factor: 1.0,
        min_speed: 1.0,
        max_speed: 15.0,
        max_speed_keys: &[],
        max_speed_factor: 1.0,
        destination_speed: None,
        ferry_speed: Some(15.0),
        block_fords: true,
        turn_costs: false,
        max_track_grade_level: 1,
        min_max_width: None,
        acceleration: None,
        residential_penalty: false,
        oneway: OnewayMode::Foot,
        non_highways: pedestrian_non_highways(),
        rejections: Vec::new(),
        priority_rules: vec![
            PriorityRule::WheelchairFeatures { weight: 2 },
            PriorityRule::Tag {
                weight: 100,
                key: "wheelchair",
                values: &["designated"],
                code: PriorityCode::VeryNice,
            },
            PriorityRule::Tag {
                weight: 100,
                key: "wheelchair",
                values: &["limited"],
                code: PriorityCode::AvoidIfPossible,
            },
        ],
    }
}
