// sentinel-core/src/domain/mod.rs

pub mod analysis;
pub mod audit;
pub mod dataset;
pub mod error;
pub mod policy;
pub mod risk;
pub mod severity;
pub mod stats;

pub use audit::{AuditResult, Auditor};
pub use error::DomainError;
