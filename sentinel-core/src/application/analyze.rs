// sentinel-core/src/application/analyze.rs
//
// Single-analyzer runs, for partial refreshes and debugging.

use serde::Serialize;
use std::fmt;
use tracing::instrument;

use crate::domain::analysis::{
    BiasAnalyzer, BiasResult, DriftAnalyzer, DriftResult, ExplainabilityAnalyzer,
    ExplainabilityResult,
};
use crate::domain::dataset::DatasetMode;
use crate::domain::policy::RiskPolicy;
use crate::error::SentinelError;
use crate::ports::dataset::DatasetProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Bias,
    Drift,
    Explainability,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bias => "bias",
            Self::Drift => "drift",
            Self::Explainability => "explainability",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "lowercase")]
pub enum ComponentReport {
    Bias(BiasResult),
    Drift(DriftResult),
    Explainability(ExplainabilityResult),
}

impl ComponentReport {
    pub fn score(&self) -> f64 {
        match self {
            Self::Bias(r) => r.score,
            Self::Drift(r) => r.score,
            Self::Explainability(r) => r.score,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Self::Bias(r) => &r.explanation,
            Self::Drift(r) => &r.explanation,
            Self::Explainability(r) => &r.explanation,
        }
    }
}

/// Runs one analyzer on the feed. The baseline is only loaded for drift.
#[instrument(skip(provider, policy), fields(component = %component, mode = %mode))]
pub fn run_component(
    provider: &dyn DatasetProvider,
    policy: &RiskPolicy,
    component: Component,
    mode: DatasetMode,
) -> Result<ComponentReport, SentinelError> {
    let current = provider.dataset(mode)?;
    let report = match component {
        Component::Bias => ComponentReport::Bias(BiasAnalyzer::analyze(&current, &policy.bias)?),
        Component::Drift => {
            let baseline = provider.baseline()?;
            ComponentReport::Drift(DriftAnalyzer::analyze(&current, &baseline, &policy.drift)?)
        }
        Component::Explainability => ComponentReport::Explainability(
            ExplainabilityAnalyzer::analyze(&current, &policy.explainability)?,
        ),
    };
    Ok(report)
}
