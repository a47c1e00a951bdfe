// sentinel-core/src/application/mod.rs

pub mod analyze;
pub mod audit;
pub mod export;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use sentinel_core::application::{run_audit, run_component, export_datasets};`

pub use analyze::{Component, ComponentReport, run_component};
pub use audit::run_audit;
pub use export::export_datasets;
