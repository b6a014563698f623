pub mod analysis;
pub mod builder;
pub mod framework;
pub mod test_data;
