pub mod astar_heuristic;
mod bidirectional_dijkstra;
pub mod calculator_state;
mod core_search;
pub mod engine;
pub mod path_calculator;
pub mod request;
pub mod routing_path;
pub(crate) mod search_direction;
mod search_space;
mod shortest_path_algorithm;

pub use engine::RoutingEngine;
pub use path_calculator::{AlgorithmKind, PathCalculator, SearchOptions, SearchOutcome};
pub use request::{RouteOptions, RouteRequest};
pub use routing_path::{RoutingPath, RoutingPathLeg};
