pub mod error;
pub mod request;
pub mod script_service;
