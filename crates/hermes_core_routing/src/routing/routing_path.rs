use crate::{
    distance::{Distance, Meters},
    edge_direction::EdgeDirection,
    geopoint::GeoPoint,
    types::EdgeId,
    weighting::{Milliseconds, Weight},
};

/// Path between two consecutive waypoints, over original edges.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPathLeg {
    distance: Distance<Meters>,
    time: Milliseconds,
    weight: Weight,
    edges: Vec<(EdgeId, EdgeDirection)>,
    points: Vec<GeoPoint>,
}

impl RoutingPathLeg {
    pub fn new(
        distance: Distance<Meters>,
        time: Milliseconds,
        weight: Weight,
        edges: Vec<(EdgeId, EdgeDirection)>,
        points: Vec<GeoPoint>,
    ) -> RoutingPathLeg {
        RoutingPathLeg {
            distance,
            time,
            weight,
            edges,
            points,
        }
    }

    pub fn distance(&self) -> Distance<Meters> {
        self.distance
    }

    pub fn time(&self) -> Milliseconds {
        self.time
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Original edges in travel order, with the direction each one is
    /// traversed in.
    pub fn edges(&self) -> &[(EdgeId, EdgeDirection)] {
        &self.edges
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|(edge_id, _)| *edge_id)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingPath {
    legs: Vec<RoutingPathLeg>,
}

impl RoutingPath {
    pub fn new(legs: Vec<RoutingPathLeg>) -> RoutingPath {
        RoutingPath { legs }
    }

    pub fn legs(&self) -> &[RoutingPathLeg] {
        &self.legs
    }

    pub fn distance(&self) -> Distance<Meters> {
        self.legs.iter().map(|leg| leg.distance()).sum()
    }

    pub fn time(&self) -> Milliseconds {
        self.legs
            .iter()
            .fold(0, |total: Milliseconds, leg| total.saturating_add(leg.time()))
    }

    pub fn weight(&self) -> Weight {
        self.legs
            .iter()
            .fold(0, |total: Weight, leg| total.saturating_add(leg.weight()))
    }

    /// Geometry of the whole path, the point shared by two legs is kept
    /// once.
    pub fn points(&self) -> Vec<GeoPoint> {
        let mut points: Vec<GeoPoint> = Vec::new();
        for leg in &self.legs {
            let skip = usize::from(points.last().is_some_and(|last| leg.points().first() == Some(last)));
            points.extend(leg.points().iter().skip(skip));
        }
        points
    }
}
