use super::{
    priority::{PriorityCode, PriorityRule},
    profile::{NonHighway, OnewayMode, Profile, ProfileKind},
    speed_config::SpeedConfig,
};

pub(crate) const PEDESTRIAN_RESTRICTED_VALUES: &[&str] =
    &["private", "no", "restricted", "military", "emergency"];
pub(crate) const PEDESTRIAN_PASS_BARRIERS: &[&str] = &[
    "gate",
    "lift_gate",
    "swing_gate",
    "kissing_gate",
    "bollard",
    "cycle_barrier",
    "motorcycle_barrier",
    "block",
    "border_control",
    "toll_booth",
    "cattle_grid",
];

pub(crate) const SAFE_WALKING_CLASSES: &[&str] = &[
    "footway",
    "path",
    "steps",
    "pedestrian",
    "living_street",
    "track",
    "residential",
    "service",
];

pub(crate) const AVOID_UNLESS_SIDEWALK_CLASSES: &[&str] = &[
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
];

pub(crate) const SIDEWALK_VALUES: &[&str] = &["yes", "both", "left", "right", "separate"];

pub(crate) fn pedestrian_non_highways() -> Vec<NonHighway> {
    vec![
        NonHighway {
            key: "railway",
            value: "platform",
            class: "platform",
        },
        NonHighway {
            key: "man_made",
            value: "pier",
            class: "pier",
        },
    ]
}

pub fn profile() -> Profile {
    Profile {
        kind: ProfileKind::Foot,
        restrictions: &["foot", "access"],
        restricted_values: PEDESTRIAN_RESTRICTED_VALUES,
        intended_values: &["yes", "designated", "official", "permissive", "destination"],
        pass_barriers: PEDESTRIAN_PASS_BARRIERS,
        block_barriers: &["fence", "wall"],
        speeds: SpeedConfig::new(
            &[
                ("footway", 5),
                ("path", 5),
                ("steps", 2),
                ("pedestrian", 5),
                ("living_street", 5),
                ("track", 5),
                ("residential", 5),
                ("service", 5),
                ("unclassified", 5),
                ("road", 5),
                ("cycleway", 5),
                ("bridleway", 4),
                ("trunk", 5),
                ("trunk_link", 5),
                ("primary", 5),
                ("primary_link", 5),
                ("secondary", 5),
                ("secondary_link", 5),
                ("tertiary", 5),
                ("tertiary_link", 5),
                ("platform", 5),
                ("pier", 5),
            ],
            &[],
            &[],
        ),
        speed_factor: 1.0,
        min_speed: 1.0,
        max_speed: 15.0,
        max_speed_keys: &[],
        max_speed_factor: 1.0,
        destination_speed: None,
        ferry_speed: Some(15.0),
        block_fords: false,
        turn_costs: false,
        max_track_grade_level: u8::MAX,
        min_max_width: None,
        acceleration: None,
        residential_penalty: false,
        oneway: OnewayMode::Foot,
        non_highways: pedestrian_non_highways(),
        rejections: Vec::new(),
        priority_rules: vec![
            PriorityRule::Network {
                weight: 110,
                routes: &["hiking", "foot"],
                networks: &[
                    ("iwn", PriorityCode::Best),
                    ("nwn", PriorityCode::Best),
                    ("rwn", PriorityCode::VeryNice),
                    ("lwn", PriorityCode::VeryNice),
                ],
            },
            PriorityRule::Tag {
                weight: 100,
                key: "foot",
                values: &["designated"],
                code: PriorityCode::Prefer,
            },
            PriorityRule::Class {
                weight: 40,
                classes: &[
                    ("footway", PriorityCode::Prefer),
                    ("path", PriorityCode::Prefer),
                    ("steps", PriorityCode::Prefer),
                    ("pedestrian", PriorityCode::Prefer),
                    ("living_street", PriorityCode::Prefer),
                    ("track", PriorityCode::Prefer),
                    ("residential", PriorityCode::Prefer),
                    ("service", PriorityCode::Prefer),
                ],
            },
            PriorityRule::Tag {
                weight: 40,
                key: "tunnel",
                values: &["yes"],
                code: PriorityCode::AvoidIfPossible,
            },
            PriorityRule::ClassWithoutTag {
                weight: 45,
                classes: AVOID_UNLESS_SIDEWALK_CLASSES,
                key: "sidewalk",
                values: SIDEWALK_VALUES,
                code: PriorityCode::AvoidIfPossible,
            },
            PriorityRule::Speed {
                weight: 45,
                min_speed: 50.0,
                max_speed: f64::INFINITY,
                code: PriorityCode::AvoidIfPossible,
            },
            PriorityRule::Tag {
                weight: 44,
                key: "bicycle",
                values: &["official", "designated"],
                code: PriorityCode::AvoidIfPossible,
            },
        ],
    }
}
