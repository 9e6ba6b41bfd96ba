use fxhash::FxHashSet;
use serde::Deserialize;

use crate::{
    ch::core_restrictions::RestrictionKind,
    edge_direction::EdgeDirection,
    graph::{
        EdgeAttributes, EdgeRecord,
        attributes::{BorderAttributes, BorderKind},
    },
};

use super::EdgeFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderRule {
    /// No border may be crossed.
    AvoidAll,
    /// Open borders may be crossed.
    AvoidControlled,
    /// Only borders of the avoided countries are forbidden.
    AvoidCountries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderCrossing {
    InsideAllowedGroup,
    ForbiddenPair,
    OpenBorder,
}

pub struct AvoidBordersEdgeFilter {
    rule: BorderRule,
    avoided_countries: FxHashSet<u16>,
    open_border_groups: Vec<FxHashSet<u16>>,
}

impl AvoidBordersEdgeFilter {
    pub fn new(rule: BorderRule) -> Self {
        AvoidBordersEdgeFilter {
            rule,
            avoided_countries: FxHashSet::default(),
            open_border_groups: Vec::new(),
        }
    }

    pub fn with_avoided_countries(mut self, countries: impl IntoIterator<Item = u16>) -> Self {
        self.avoided_countries.extend(countries);
        self
    }

    /// Countries whose common borders are open whatever their border kind.
    pub fn with_open_border_group(mut self, countries: impl IntoIterator<Item = u16>) -> Self {
        self.open_border_groups.push(countries.into_iter().collect());
        self
    }

    pub fn rule(&self) -> BorderRule {
        self.rule
    }

    fn is_open(&self, border: &BorderAttributes) -> bool {
        border.kind == BorderKind::Open
            || self.open_border_groups.iter().any(|group| {
                group.contains(&border.start_country) && group.contains(&border.end_country)
            })
    }

    pub fn classify(&self, border: &BorderAttributes) -> BorderCrossing {
        if !border.is_border() {
            return BorderCrossing::InsideAllowedGroup;
        }

        if self.avoided_countries.contains(&border.start_country)
            || self.avoided_countries.contains(&border.end_country)
        {
            return BorderCrossing::ForbiddenPair;
        }

        match self.rule {
            BorderRule::AvoidAll => BorderCrossing::ForbiddenPair,
            _ if self.is_open(border) => BorderCrossing::OpenBorder,
            BorderRule::AvoidControlled => BorderCrossing::ForbiddenPair,
            BorderRule::AvoidCountries => BorderCrossing::InsideAllowedGroup,
        }
    }
}

impl EdgeFilter for AvoidBordersEdgeFilter {
    fn name(&self) -> &'static str {
        "avoid_borders"
    }

    fn accept(&self, _edge: &EdgeRecord, attributes: &EdgeAttributes, _direction: EdgeDirection) -> bool {
        self.classify(&attributes.border) != BorderCrossing::ForbiddenPair
    }

    fn restriction_kind(&self) -> Option<RestrictionKind> {
        Some(RestrictionKind::Borders)
    }
}
