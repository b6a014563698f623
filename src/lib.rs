pub mod cli;
pub mod generation;
pub mod prompt;
pub mod screen;
pub mod server;
pub mod service;
pub mod templates;
pub mod trace;
pub mod vision;
