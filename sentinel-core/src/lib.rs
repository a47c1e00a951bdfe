// sentinel-core/src/lib.rs

// 1. Documentation is not enforced yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the engine needs from the outside world (dataset feeds).
pub mod ports;

// 2. Domain (Risk engine core)
// Dataset model, statistics, analyzers, aggregation, recommendations.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Policy files, synthetic and JSON dataset feeds, atomic writes.
pub mod infrastructure;

// 4. Application (Use Cases)
// Run an audit, run a single analyzer, export datasets.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use sentinel_core::SentinelError;
pub use error::SentinelError;
