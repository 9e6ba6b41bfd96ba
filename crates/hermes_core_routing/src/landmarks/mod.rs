mod landmark_search;
pub mod lm_data;
pub mod lm_heuristic;
pub mod lm_preparation;
