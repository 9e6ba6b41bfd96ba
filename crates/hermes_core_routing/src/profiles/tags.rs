use fxhash::FxHashMap;

use crate::{
    distance::{Distance, Meters},
    geopoint::{GeoPoint, polyline_distance},
};

/// Key/value tags of a way, node or relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags(FxHashMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Tags(FxHashMap::default())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }

    pub fn has_tag_in(&self, key: &str, values: &[&str]) -> bool {
        self.tag(key).is_some_and(|value| values.contains(&value))
    }

    /// Whether any of `keys` carries one of `values`.
    pub fn any_tag_in(&self, keys: &[&str], values: &[&str]) -> bool {
        keys.iter().any(|key| self.has_tag_in(key, values))
    }

    /// Leading number of a value such as `3.5 t` or `2.1`.
    pub fn parse_f64(&self, key: &str) -> Option<f64> {
        self.tag(key).and_then(parse_leading_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

pub(crate) fn parse_leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-'))
        .map_or(value.len(), |(index, _)| index);

    value[..end]
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: i64,
    pub point: GeoPoint,
    pub tags: Tags,
}

impl RawNode {
    pub fn new(id: i64, point: GeoPoint) -> Self {
        RawNode {
            id,
            point,
            tags: Tags::new(),
        }
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawWay {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: Tags,
    /// Tags of the route relations the way belongs to.
    pub relation_tags: Vec<Tags>,
    pub geometry: Option<Vec<GeoPoint>>,
}

impl RawWay {
    pub fn new(id: i64, nodes: Vec<i64>, tags: Tags) -> Self {
        RawWay {
            id,
            nodes,
            tags,
            relation_tags: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_relation(mut self, tags: Tags) -> Self {
        self.relation_tags.push(tags);
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.tag(key)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.has_tag(key, value)
    }

    pub fn estimated_distance(&self) -> Option<Distance<Meters>> {
        self.geometry
            .as_deref()
            .filter(|geometry| geometry.len() >= 2)
            .map(polyline_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_leading_numbers() {
        assert_eq!(parse_leading_number("3.5 t"), Some(3.5));
        assert_eq!(parse_leading_number("12"), Some(12.0));
        assert_eq!(parse_leading_number("-8%"), Some(-8.0));
        assert_eq!(parse_leading_number("default"), None);
        assert_eq!(parse_leading_number("NaN"), None);
    }

    #[test]
    fn should_lookup_tags() {
        let tags: Tags = [("highway", "primary"), ("oneway", "yes")]
            .into_iter()
            .collect();
        assert!(tags.has_tag("highway", "primary"));
        assert!(tags.has_tag_in("oneway", &["yes", "true", "1"]));
        assert!(!tags.has_key("maxspeed"));
        assert!(tags.any_tag_in(&["junction", "oneway"], &["yes"]));
    }

    #[test]
    fn should_estimate_distance_only_with_geometry() {
        let way = RawWay::new(1, vec![1, 2], Tags::new());
        assert!(way.estimated_distance().is_none());

        let way = way.with_geometry(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)]);
        let distance = way.estimated_distance().unwrap().value();
        assert!((distance - 1_111.95).abs() < 1.0);
    }
}
