// sentinel-core/src/infrastructure/adapters/mod.rs

pub mod json_file;
pub mod synthetic;

pub use json_file::JsonDatasetProvider;
pub use synthetic::SyntheticDatasetProvider;
