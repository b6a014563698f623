pub mod client;
pub mod heuristics;
pub mod image_check;
pub mod vision_model;
