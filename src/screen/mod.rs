pub mod changes;
pub mod classifier;
pub mod naming;
pub mod patterns;
pub mod screen_model;
