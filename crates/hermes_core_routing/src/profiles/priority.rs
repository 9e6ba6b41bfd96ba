use super::tags::{RawWay, Tags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum PriorityCode {
    Worst = 0,
    AvoidAtAllCosts = 1,
    ReachDest = 2,
    AvoidIfPossible = 3,
    #[default]
    Unchanged = 4,
    Prefer = 5,
    VeryNice = 6,
    Best = 7,
}

impl PriorityCode {
    pub const MAX_VALUE: u8 = 7;

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(PriorityCode::Worst),
            1 => Some(PriorityCode::AvoidAtAllCosts),
            2 => Some(PriorityCode::ReachDest),
            3 => Some(PriorityCode::AvoidIfPossible),
            4 => Some(PriorityCode::Unchanged),
            5 => Some(PriorityCode::Prefer),
            6 => Some(PriorityCode::VeryNice),
            7 => Some(PriorityCode::Best),
            _ => None,
        }
    }

    /// Multiplier of the recommended weighting, 0.5 for `Worst` up to 1.5
    /// for `Best`.
    pub fn factor(&self) -> f64 {
        0.5 + self.value() as f64 / Self::MAX_VALUE as f64
    }

    fn shifted(&self, steps: i32) -> Self {
        let value = (self.value() as i32 + steps).clamp(
            PriorityCode::AvoidAtAllCosts.value() as i32,
            PriorityCode::Best.value() as i32,
        );

        PriorityCode::from_value(value as u8).unwrap_or_default()
    }
}

/// Weighted candidates collected while evaluating the priority rules.
#[derive(Debug, Default, Clone)]
pub struct PriorityCandidates {
    entries: Vec<(u32, PriorityCode)>,
}

impl PriorityCandidates {
    pub fn new() -> Self {
        PriorityCandidates::default()
    }

    pub fn push(&mut self, weight: u32, code: PriorityCode) {
        self.entries.push((weight, code));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The candidate with the largest weight wins, on equal weights the
    /// last one pushed wins.
    pub fn resolve(&self) -> PriorityCode {
        self.entries
            .iter()
            .fold(None, |best: Option<(u32, PriorityCode)>, &(weight, code)| {
                match best {
                    Some((best_weight, _)) if best_weight > weight => best,
                    _ => Some((weight, code)),
                }
            })
            .map_or(PriorityCode::Unchanged, |(_, code)| code)
    }
}

const SIDEWALK_VALUES: &[&str] = &["yes", "both", "left", "right", "separate"];
const SMOOTH_SURFACES: &[&str] = &["asphalt", "concrete", "paved", "paving_stones", "concrete:plates"];
const ROUGH_SURFACES: &[&str] = &[
    "cobblestone",
    "unhewn_cobblestone",
    "sett",
    "gravel",
    "pebblestone",
    "sand",
    "grass",
    "ground",
    "dirt",
    "mud",
    "unpaved",
];
const BAD_SMOOTHNESS: &[&str] = &["bad", "very_bad", "horrible", "very_horrible"];
const MAX_COMFORTABLE_INCLINE: f64 = 6.0;

/// One priority rule. Rules are plain values evaluated in order against a
/// way, each one may push a weighted candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorityRule {
    /// Code per highway class.
    Class {
        weight: u32,
        classes: &'static [(&'static str, PriorityCode)],
    },
    /// `key` carries one of `values`, e.g. `foot=designated`.
    Tag {
        weight: u32,
        key: &'static str,
        values: &'static [&'static str],
        code: PriorityCode,
    },
    /// The class is one of `classes` and `key` carries one of `values`.
    ClassWithTag {
        weight: u32,
        classes: &'static [&'static str],
        key: &'static str,
        values: &'static [&'static str],
        code: PriorityCode,
    },
    /// The class is one of `classes` and `key` does not carry one of
    /// `values`, e.g. a primary road without sidewalk.
    ClassWithoutTag {
        weight: u32,
        classes: &'static [&'static str],
        key: &'static str,
        values: &'static [&'static str],
        code: PriorityCode,
    },
    /// Membership of a route relation (`route` in `routes`) with a known
    /// `network` value.
    Network {
        weight: u32,
        routes: &'static [&'static str],
        networks: &'static [(&'static str, PriorityCode)],
    },
    /// The way speed (explicit max speed, or class speed) falls in
    /// `[min_speed, max_speed)`.
    Speed {
        weight: u32,
        min_speed: f64,
        max_speed: f64,
        code: PriorityCode,
    },
    /// Accessibility score: smooth surfaces, sidewalks and lowered kerbs
    /// raise the priority, rough surfaces, steep inclines and raised kerbs
    /// lower it.
    WheelchairFeatures { weight: u32 },
}

impl PriorityRule {
    pub fn evaluate(
        &self,
        way: &RawWay,
        class: &str,
        way_speed: f64,
        candidates: &mut PriorityCandidates,
    ) {
        let tags = &way.tags;

        match self {
            PriorityRule::Class { weight, classes } => {
                if let Some((_, code)) = classes.iter().find(|(name, _)| *name == class) {
                    candidates.push(*weight, *code);
                }
            }
            PriorityRule::Tag {
                weight,
                key,
                values,
                code,
            } => {
                if tags.has_tag_in(key, values) {
                    candidates.push(*weight, *code);
                }
            }
            PriorityRule::ClassWithTag {
                weight,
                classes,
                key,
                values,
                code,
            } => {
                if classes.contains(&class) && tags.has_tag_in(key, values) {
                    candidates.push(*weight, *code);
                }
            }
            PriorityRule::ClassWithoutTag {
                weight,
                classes,
                key,
                values,
                code,
            } => {
                if classes.contains(&class) && !tags.has_tag_in(key, values) {
                    candidates.push(*weight, *code);
                }
            }
            PriorityRule::Network {
                weight,
                routes,
                networks,
            } => {
                let best = way
                    .relation_tags
                    .iter()
                    .filter(|relation| relation.has_tag_in("route", routes))
                    .filter_map(|relation| {
                        let network = relation.tag("network")?;
                        networks
                            .iter()
                            .find(|(name, _)| *name == network)
                            .map(|(_, code)| *code)
                    })
                    .max();

                if let Some(code) = best {
                    candidates.push(*weight, code);
                }
            }
            PriorityRule::Speed {
                weight,
                min_speed,
                max_speed,
                code,
            } => {
                if way_speed >= *min_speed && way_speed < *max_speed {
                    candidates.push(*weight, *code);
                }
            }
            PriorityRule::WheelchairFeatures { weight } => {
                let score = wheelchair_score(tags, class);
                candidates.push(*weight, PriorityCode::Unchanged.shifted(score));
            }
        }
    }
}

fn wheelchair_score(tags: &Tags, class: &str) -> i32 {
    let mut score = 0;

    if ["footway", "pedestrian", "living_street"].contains(&class) {
        score += 1;
    }
    if tags.any_tag_in(&["sidewalk", "sidewalk:both", "sidewalk:left", "sidewalk:right"], SIDEWALK_VALUES) {
        score += 1;
    }
    if tags.has_tag_in("surface", SMOOTH_SURFACES) {
        score += 1;
    }
    if tags.has_tag_in("kerb", &["lowered", "flush", "no"]) {
        score += 1;
    }

    if tags.has_tag_in("surface", ROUGH_SURFACES) {
        score -= 1;
    }
    if tags.has_tag_in("smoothness", BAD_SMOOTHNESS) {
        score -= 1;
    }
    if tags.has_tag_in("kerb", &["raised", "rolled"]) {
        score -= 1;
    }
    if tags
        .parse_f64("incline")
        .is_some_and(|incline| incline.abs() > MAX_COMFORTABLE_INCLINE)
    {
        score -= 2;
    }

    score
}
