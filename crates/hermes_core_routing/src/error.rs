use std::fmt;

use thiserror::Error;

use crate::{
    routing::calculator_state::InvalidTransition,
    types::{EdgeId, NodeId},
};

/// Fatal problems in how the engine, the profiles or the store were set up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("highway class `{class}` is accepted by profile `{profile}` but has no speed")]
    UnknownHighwayClass { profile: String, class: String },
    #[error("invalid profile `{profile}`: {reason}")]
    InvalidProfile { profile: String, reason: String },
    #[error("invalid profile configuration document: {0}")]
    MalformedDocument(String),
    #[error("could not read profile configuration document: {0}")]
    UnreadableDocument(String),
    #[error("weighting `{0}` is already registered")]
    DuplicateWeighting(String),
    #[error("weighting `{0}` registered after preparation started")]
    PreparationStarted(String),
    #[error("profile `{0}` is not registered in the graph store")]
    UnknownProfile(String),
    #[error("graph store is frozen")]
    StoreFrozen,
    #[error("graph store must be frozen before {0}")]
    StoreNotFrozen(&'static str),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    #[error("edge carries {actual} flag words, expected {expected}")]
    FlagsMismatch { expected: usize, actual: usize },
    #[error("{kind} `{name}` is already registered")]
    DuplicateSubStore { kind: &'static str, name: String },
    #[error("invalid engine configuration: {0}")]
    InvalidEngineConfig(String),
}

/// Problems with a single routing request, reported to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("profile `{0}` is not supported")]
    UnsupportedProfile(String),
    #[error("weighting `{0}` is not supported")]
    UnknownWeighting(String),
    #[error("`{0}` cannot be disabled on this server")]
    MandatoryOptimization(&'static str),
    #[error("max visited nodes {requested} is above the server limit of {limit}")]
    MaxVisitedNodesAboveLimit { requested: usize, limit: usize },
    #[error("malformed route request: {0}")]
    MalformedRequest(String),
    #[error("malformed filter parameters: {0}")]
    MalformedFilter(String),
    #[error("a route needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("waypoint {index} ({lat}, {lng}) is outside the supported area")]
    OutOfBounds { index: usize, lat: f64, lng: f64 },
    #[error("waypoint {0} could not be matched to the road network")]
    UnroutableWaypoint(usize),
}

/// Per-way ingestion problems. The way is skipped, ingestion continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataAnomaly {
    #[error("way {way} has {count} nodes")]
    TooFewNodes { way: i64, count: usize },
    #[error("way {way} references unknown node {node}")]
    UnknownNode { way: i64, node: i64 },
    #[error("node {node} has invalid coordinates")]
    InvalidCoordinates { node: i64 },
    #[error("way {way} has an unusable `{key}` value `{value}`")]
    InvalidTag {
        way: i64,
        key: &'static str,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncoderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Anomaly(#[from] DataAnomaly),
}

/// Search outcome of a failed leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegFailure {
    NoPath,
    AbortedMaxNodes { visited_nodes: usize },
}

impl fmt::Display for LegFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegFailure::NoPath => write!(f, "no path"),
            LegFailure::AbortedMaxNodes { visited_nodes } => {
                write!(f, "aborted after visiting {visited_nodes} nodes")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("leg {leg} failed: {failure}")]
    LegFailed { leg: usize, failure: LegFailure },
    #[error(transparent)]
    InvalidState(#[from] InvalidTransition),
}
