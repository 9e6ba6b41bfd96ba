use crate::{
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight},
};

pub(crate) const INVALID_NODE: NodeId = usize::MAX;
pub(crate) const INVALID_EDGE: EdgeId = usize::MAX;
pub(crate) const MAX_WEIGHT: Weight = u32::MAX;
pub(crate) const MAX_DURATION: Milliseconds = u32::MAX;

pub(crate) const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub(crate) const DISTANCE_INFLUENCE: f64 = 50.0;

pub(crate) const MPH_TO_KPH: f64 = 1.60934;
pub(crate) const KNOTS_TO_KPH: f64 = 1.852;

/// Priority given to core nodes, they are never contracted.
pub const RESTRICTION_PRIORITY: i32 = i32::MAX;

/// Node counters stored on an edge saturate at this value.
pub(crate) const MAX_NODE_COUNTER: u8 = 15;
