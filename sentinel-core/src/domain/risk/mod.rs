// sentinel-core/src/domain/risk/mod.rs

pub mod aggregator;
pub mod recommendation;

pub use aggregator::{CompositeRisk, RiskContributions, RiskStatus, composite_risk, executive_summary};
pub use recommendation::{Category, Recommendation, generate_recommendations};
