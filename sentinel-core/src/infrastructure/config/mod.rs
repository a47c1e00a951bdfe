// sentinel-core/src/infrastructure/config/mod.rs

pub mod policy;

pub use policy::{load_policy, load_policy_file};
