use super::{
    foot::pedestrian_non_highways,
    priority::{PriorityCode, PriorityRule},
    profile::{OnewayMode, Profile, ProfileKind},
    speed_config::SpeedConfig,
};

const PUSHING_CLASSES: &[&str] = &["footway", "pedestrian", "steps", "platform"];
const AVOID_CLASSES: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
];
const BIKE_NETWORKS: &[(&str, PriorityCode)] = &[
    ("icn", PriorityCode::Best),
    ("ncn", PriorityCode::Best),
    ("rcn", PriorityCode::VeryNice),
    ("lcn", PriorityCode::Prefer),
    ("mtb", PriorityCode::Unchanged),
    ("deprecated", PriorityCode::AvoidAtAllCosts),
];

fn base_profile(kind: ProfileKind, speeds: SpeedConfig, max_speed: f64) -> Profile {
    Profile {
        kind,
        restrictions: &["bicycle", "vehicle", "access"],
        restricted_values: &["private", "no", "restricted", "military", "emergency"],
        intended_values: &["yes", "designated", "official", "permissive", "destination"],
        pass_barriers: &[
            "gate",
            "lift_gate",
            "swing_gate",
            "cycle_barrier",
            "kissing_gate",
            "bollard",
            "block",
            "border_control",
            "toll_booth",
            "cattle_grid",
        ],
        block_barriers: &["fence", "wall", "turnstile", "stile"],
        speeds,
        speed_factor: 2.0,
        min_speed: 2.0,
        max_speed,
        max_speed_keys: &["maxspeed"],
        max_speed_factor: 1.0,
        destination_speed: None,
        ferry_speed: Some(14.0),
        block_fords: false,
        turn_costs: false,
        max_track_grade_level: u8::MAX,
        min_max_width: None,
        acceleration: None,
        residential_penalty: false,
        oneway: OnewayMode::Bike,
        non_highways: pedestrian_non_highways(),
        rejections: Vec::new(),
        priority_rules: vec![
            PriorityRule::Network {
                weight: 110,
                routes: &["bicycle"],
                networks: BIKE_NETWORKS,
            },
            PriorityRule::Class {
                weight: 100,
                classes: &[("cycleway", PriorityCode::VeryNice)],
            },
            PriorityRule::Tag {
                weight: 100,
                key: "bicycle",
                values: &["designated", "official"],
                code: PriorityCode::Prefer,
            },
            PriorityRule::Class {
                weight: 100,
                classes: &[
                    ("footway", PriorityCode::AvoidIfPossible),
                    ("pedestrian", PriorityCode::AvoidIfPossible),
                    ("steps", PriorityCode::AvoidIfPossible),
                    ("platform", PriorityCode::AvoidIfPossible),
                ],
            },
            PriorityRule::ClassWithTag {
                weight: 100,
                classes: PUSHING_CLASSES,
                key: "bicycle",
                values: &["yes", "permissive", "designated"],
                code: PriorityCode::Prefer,
            },
            PriorityRule::Class {
                weight: 40,
                classes: &[
                    ("residential", PriorityCode::Prefer),
                    ("living_street", PriorityCode::Prefer),
                    ("service", PriorityCode::Prefer),
                    ("unclassified", PriorityCode::Prefer),
                    ("road", PriorityCode::Prefer),
                ],
            },
            PriorityRule::Speed {
                weight: 40,
                min_speed: 0.0,
                max_speed: 31.0,
                code: PriorityCode::Prefer,
            },
            PriorityRule::Tag {
                weight: 40,
                key: "tunnel",
                values: &["yes"],
                code: PriorityCode::Unchanged,
            },
            PriorityRule::Tag {
                weight: 40,
                key: "cycleway",
                values: &["lane", "track", "opposite_lane", "opposite_track"],
                code: PriorityCode::Prefer,
            },
            PriorityRule::Class {
                weight: 50,
                classes: &[
                    ("motorway", PriorityCode::ReachDest),
                    ("motorway_link", PriorityCode::ReachDest),
                    ("trunk", PriorityCode::ReachDest),
                    ("trunk_link", PriorityCode::ReachDest),
                    ("primary", PriorityCode::ReachDest),
                    ("primary_link", PriorityCode::ReachDest),
                ],
            },
            PriorityRule::ClassWithTag {
                weight: 50,
                classes: AVOID_CLASSES,
                key: "cycleway",
                values: &["lane", "track"],
                code: PriorityCode::Unchanged,
            },
            PriorityRule::Speed {
                weight: 50,
                min_speed: 71.0,
                max_speed: f64::INFINITY,
                code: PriorityCode::ReachDest,
            },
            PriorityRule::Tag {
                weight: 50,
                key: "railway",
                values: &["tram"],
                code: PriorityCode::AvoidAtAllCosts,
            },
        ],
    }
}

pub fn regular_profile() -> Profile {
    base_profile(
        ProfileKind::RegularBike,
        SpeedConfig::new(
            &[
                ("cycleway", 18),
                ("path", 10),
                ("footway", 6),
                ("pedestrian", 6),
                ("steps", 2),
                ("platform", 6),
                ("pier", 6),
                ("track", 12),
                ("service", 14),
                ("residential", 18),
                ("living_street", 6),
                ("unclassified", 16),
                ("road", 12),
                ("trunk", 18),
                ("trunk_link", 18),
                ("primary", 18),
                ("primary_link", 18),
                ("secondary", 18),
                ("secondary_link", 18),
                ("tertiary", 18),
                ("tertiary_link", 18),
                ("bridleway", 6),
            ],
            &[
                ("asphalt", -1),
                ("concrete", -1),
                ("paved", -1),
                ("concrete:lanes", 16),
                ("concrete:plates", 16),
                ("paving_stones", 12),
                ("cobblestone", 8),
                ("cobblestone:flattened", 10),
                ("sett", 10),
                ("compacted", 14),
                ("fine_gravel", 14),
                ("unpaved", 12),
                ("gravel", 12),
                ("ground", 12),
                ("dirt", 10),
                ("pebblestone", 12),
                ("grass", 8),
                ("grass_paver", 8),
                ("wood", 6),
                ("metal", 10),
                ("salt", 6),
                ("sand", 6),
                ("ice", 2),
                ("mud", 4),
            ],
            &[
                ("grade1", 18),
                ("grade2", 12),
                ("grade3", 8),
                ("grade4", 6),
                ("grade5", 4),
            ],
        ),
        30.0,
    )
}

pub fn mountain_profile() -> Profile {
    let mut profile = base_profile(
        ProfileKind::MountainBike,
        SpeedConfig::new(
            &[
                ("cycleway", 18),
                ("path", 18),
                ("footway", 6),
                ("pedestrian", 6),
                ("steps", 2),
                ("platform", 6),
                ("pier", 6),
                ("track", 18),
                ("service", 14),
                ("residential", 16),
                ("living_street", 6),
                ("unclassified", 16),
                ("road", 12),
                ("trunk", 18),
                ("trunk_link", 18),
                ("primary", 18),
                ("primary_link", 18),
                ("secondary", 18),
                ("secondary_link", 18),
                ("tertiary", 18),
                ("tertiary_link", 18),
                ("bridleway", 10),
            ],
            &[
                ("asphalt", -1),
                ("concrete", -1),
                ("paved", -1),
                ("paving_stones", 14),
                ("cobblestone", 10),
                ("sett", 12),
                ("compacted", 18),
                ("fine_gravel", 18),
                ("unpaved", 16),
                ("gravel", 16),
                ("ground", 16),
                ("dirt", 14),
                ("grass", 12),
                ("sand", 8),
                ("mud", 6),
                ("ice", 2),
            ],
            &[
                ("grade1", 18),
                ("grade2", 16),
                ("grade3", 14),
                ("grade4", 12),
                ("grade5", 10),
            ],
        ),
        30.0,
    );

    profile.priority_rules.push(PriorityRule::Class {
        weight: 60,
        classes: &[
            ("track", PriorityCode::VeryNice),
            ("path", PriorityCode::VeryNice),
            ("bridleway", PriorityCode::Prefer),
        ],
    });
    profile
}

pub fn road_profile() -> Profile {
    let mut profile = base_profile(
        ProfileKind::RoadBike,
        SpeedConfig::new(
            &[
                ("cycleway", 20),
                ("path", 8),
                ("footway", 6),
                ("pedestrian", 6),
                ("steps", 2),
                ("platform", 6),
                ("pier", 6),
                ("track", 6),
                ("service", 14),
                ("residential", 20),
                ("living_street", 6),
                ("unclassified", 20),
                ("road", 12),
                ("trunk", 24),
                ("trunk_link", 24),
                ("primary", 24),
                ("primary_link", 24),
                ("secondary", 24),
                ("secondary_link", 24),
                ("tertiary", 22),
                ("tertiary_link", 22),
                ("bridleway", 4),
            ],
            &[
                ("asphalt", -1),
                ("concrete", -1),
                ("paved", -1),
                ("paving_stones", 10),
                ("cobblestone", 6),
                ("sett", 6),
                ("compacted", 10),
                ("fine_gravel", 8),
                ("unpaved", 6),
                ("gravel", 6),
                ("ground", 4),
                ("dirt", 4),
                ("grass", 4),
                ("sand", 2),
                ("mud", 2),
                ("ice", 2),
            ],
            &[
                ("grade1", 20),
                ("grade2", 10),
                ("grade3", 6),
                ("grade4", 4),
                ("grade5", 2),
            ],
        ),
        40.0,
    );

    profile.max_track_grade_level = 3;
    profile.priority_rules.push(PriorityRule::Tag {
        weight: 60,
        key: "surface",
        values: &["gravel", "unpaved", "ground", "dirt", "grass", "sand", "mud"],
        code: PriorityCode::AvoidIfPossible,
    });
    profile
}
