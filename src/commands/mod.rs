pub mod build;
pub mod sources;
