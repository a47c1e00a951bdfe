// sentinel-core/src/domain/analysis/mod.rs
//
// The three risk analyzers. Each one is a pure function of its inputs and
// the matching policy section, and can be run on its own.

pub mod bias;
pub mod drift;
pub mod explainability;
pub mod violation;

pub use bias::{BiasAnalyzer, BiasResult, DisparateImpact, PrivilegeRule};
pub use drift::{DriftAnalyzer, DriftResult};
pub use explainability::{ExplainabilityAnalyzer, ExplainabilityGap, ExplainabilityResult};
pub use violation::{Violation, ViolationKind};
