pub mod core_graph;
pub mod core_preparation;
pub mod core_restrictions;
pub mod preparation_pipeline;
mod preparation_graph;
mod priority_queue;
pub mod shortcut;
mod witness_search;
