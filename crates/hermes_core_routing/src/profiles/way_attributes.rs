use crate::graph::attributes::{
    EdgeAttributes, VehicleRestrictions, VehicleTypes, WayCategory, WheelchairAttributes,
};

use super::tags::{Tags, parse_leading_number};

const RESTRICTED_ACCESS_VALUES: &[&str] = &["no", "private", "restricted"];
const DESTINATION_ACCESS_VALUES: &[&str] = &["destination", "delivery"];
const VEHICLE_TYPE_KEYS: &[&str] = &["hgv", "bus", "agricultural", "forestry", "delivery", "goods"];

pub fn way_category(tags: &Tags) -> WayCategory {
    let mut category = WayCategory::NONE;

    if tags.has_tag_in("highway", &["motorway", "motorway_link"]) {
        category.insert(WayCategory::HIGHWAYS);
    }
    if tags.any_tag_in(&["toll", "toll:hgv", "toll:motorcar"], &["yes"]) {
        category.insert(WayCategory::TOLLWAYS);
    }
    if tags.has_tag("highway", "steps") {
        category.insert(WayCategory::STEPS);
    }
    if tags.has_tag_in("route", &["ferry", "shuttle_train"]) {
        category.insert(WayCategory::FERRIES);
    }
    if tags.has_tag("ford", "yes") || tags.has_tag("highway", "ford") {
        category.insert(WayCategory::FORDS);
    }
    if tags.has_tag("tunnel", "yes") || tags.has_tag("covered", "yes") {
        category.insert(WayCategory::TUNNELS);
    }

    category
}

/// Value in meters of a length tag such as `3.5`, `3.5 m` or `12'6"`.
pub(crate) fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some((feet, inches)) = value.split_once('\'') {
        let feet = feet.trim().parse::<f64>().ok()?;
        let inches = parse_leading_number(inches.trim_end_matches('"')).unwrap_or(0.0);
        return Some(feet * 0.3048 + inches * 0.0254);
    }

    parse_leading_number(value).filter(|length| *length > 0.0)
}

/// Value in tonnes of a weight tag such as `7.5` or `7.5 t`.
fn parse_weight(value: &str) -> Option<f64> {
    let number = parse_leading_number(value)?;
    if value.trim_end().ends_with("lbs") {
        return Some(number * 0.000_453_592);
    }
    Some(number).filter(|weight| *weight > 0.0)
}

pub fn vehicle_restrictions(tags: &Tags) -> VehicleRestrictions {
    let mut restrictions = VehicleRestrictions::default();

    for key in VEHICLE_TYPE_KEYS {
        let Some(vehicle_type) = VehicleTypes::from_name(key) else {
            continue;
        };

        if tags.has_tag_in(key, RESTRICTED_ACCESS_VALUES) {
            restrictions.restricted_types.insert(vehicle_type);
        } else if tags.has_tag_in(key, DESTINATION_ACCESS_VALUES) {
            restrictions.destination_types.insert(vehicle_type);
        }
    }

    restrictions.hazmat_forbidden = tags.has_tag("hazmat", "no");
    restrictions.max_height = tags.tag("maxheight").and_then(parse_length);
    restrictions.max_width = tags.tag("maxwidth").and_then(parse_length);
    restrictions.max_length = tags.tag("maxlength").and_then(parse_length);
    restrictions.max_weight = tags.tag("maxweight").and_then(parse_weight);
    restrictions.max_axle_load = tags.tag("maxaxleload").and_then(parse_weight);

    restrictions
}

fn surface_class(surface: &str) -> Option<u8> {
    match surface {
        "asphalt" | "concrete" | "concrete:plates" | "paved" => Some(1),
        "paving_stones" | "compacted" | "metal" | "wood" => Some(2),
        "fine_gravel" | "sett" | "concrete:lanes" | "bricks" => Some(3),
        "cobblestone" | "gravel" | "pebblestone" | "unpaved" => Some(4),
        "ground" | "dirt" | "earth" | "grass" | "grass_paver" => Some(5),
        "sand" | "mud" | "ice" | "snow" => Some(6),
        _ => None,
    }
}

fn smoothness_class(smoothness: &str) -> Option<u8> {
    match smoothness {
        "excellent" => Some(1),
        "good" => Some(2),
        "intermediate" => Some(3),
        "bad" => Some(4),
        "very_bad" => Some(5),
        "horrible" => Some(6),
        "very_horrible" => Some(7),
        "impassable" => Some(8),
        _ => None,
    }
}

/// Level of a `tracktype` value, `grade1` to `grade6`. Several values
/// separated by `;` give the roughest one, unknown values give 10.
pub fn track_grade(tracktype: &str) -> u8 {
    tracktype
        .split(';')
        .map(|grade| {
            grade
                .trim()
                .strip_prefix("grade")
                .and_then(|level| level.parse::<u8>().ok())
                .filter(|level| (1..=6).contains(level))
                .unwrap_or(10)
        })
        .max()
        .unwrap_or(10)
}

/// Height in centimeters of a kerb value given in meters or centimeters.
fn parse_kerb_height(value: &str) -> Option<f64> {
    let number = parse_leading_number(value)?;
    if value.trim_end().ends_with("cm") {
        Some(number)
    } else if value.trim_end().ends_with('m') || number < 1.0 {
        Some(number * 100.0)
    } else {
        Some(number)
    }
}

pub fn wheelchair_attributes(tags: &Tags) -> WheelchairAttributes {
    let kerb_height = tags
        .tag("kerb:height")
        .or_else(|| tags.tag("sloped_curb"))
        .and_then(parse_kerb_height)
        .or_else(|| match tags.tag("kerb") {
            Some("lowered") | Some("flush") | Some("no") => Some(0.0),
            Some("raised") => Some(10.0),
            _ => None,
        });

    WheelchairAttributes {
        surface: tags.tag("surface").and_then(surface_class),
        smoothness: tags.tag("smoothness").and_then(smoothness_class),
        track_type: tags.tag("tracktype").map(track_grade),
        incline: tags
            .tag("incline")
            .and_then(parse_leading_number)
            .map(f64::abs),
        kerb_height,
        width: tags.tag("width").and_then(parse_length).map(|width| width * 100.0),
    }
}

/// Every externally filterable attribute derived from the way tags. Border
/// data is not derivable from tags and stays empty.
pub fn edge_attributes(tags: &Tags) -> EdgeAttributes {
    EdgeAttributes {
        way_category: way_category(tags),
        vehicle: vehicle_restrictions(tags),
        wheelchair: wheelchair_attributes(tags),
        ..EdgeAttributes::default()
    }
}
