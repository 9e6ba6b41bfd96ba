pub mod ch;
pub mod config;
pub mod constants;
pub mod distance;
pub mod edge_direction;
pub mod error;
pub mod filters;
pub mod geopoint;
pub mod graph;
pub mod landmarks;
pub mod profiles;
pub mod routing;
pub mod stopwatch;
pub mod types;
pub mod weighting;

mod test_graph_utils;
