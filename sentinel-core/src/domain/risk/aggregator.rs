// sentinel-core/src/domain/risk/aggregator.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::analysis::{BiasResult, DriftResult};
use crate::domain::policy::AggregatePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskStatus {
    Pass,
    Warning,
    Fail,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three weighted terms of the composite, kept for traceability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskContributions {
    pub bias_contribution: f64,
    pub drift_contribution: f64,
    pub explainability_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeRisk {
    pub score: f64,
    pub status: RiskStatus,
    pub components: RiskContributions,
}

/// PASS up to and including the pass ceiling, WARNING up to and including
/// the warning ceiling, FAIL above.
pub fn risk_status(score: f64, policy: &AggregatePolicy) -> RiskStatus {
    if score <= policy.pass_ceiling {
        RiskStatus::Pass
    } else if score <= policy.warning_ceiling {
        RiskStatus::Warning
    } else {
        RiskStatus::Fail
    }
}

/// Folds the component scores into one AI risk score. Explainability is
/// "higher is better", so it enters inverted.
pub fn composite_risk(
    bias_score: f64,
    drift_score: f64,
    explainability_score: f64,
    policy: &AggregatePolicy,
) -> CompositeRisk {
    let components = RiskContributions {
        bias_contribution: policy.bias_weight * bias_score,
        drift_contribution: policy.drift_weight * drift_score,
        explainability_contribution: policy.explainability_weight * (100.0 - explainability_score),
    };
    let score = (components.bias_contribution
        + components.drift_contribution
        + components.explainability_contribution)
        .clamp(0.0, 100.0);

    CompositeRisk {
        score,
        status: risk_status(score, policy),
        components,
    }
}

/// One-line summary for executives, chosen by status.
pub fn executive_summary(risk: &CompositeRisk, bias: &BiasResult, drift: &DriftResult) -> String {
    match risk.status {
        RiskStatus::Pass => format!(
            "Model performance is healthy with an AI Risk Score of {:.0}. No critical issues detected.",
            risk.score
        ),
        RiskStatus::Warning => {
            let concern = if bias.score > drift.score {
                format!("bias concerns (DI: {:.2})", bias.gender_di.ratio)
            } else {
                format!(
                    "performance drift (accuracy drop: {:.1}%)",
                    drift.accuracy_drift.accuracy_drop_percent
                )
            };
            format!(
                "Elevated AI Risk Score of {:.0} due to {}. Review recommended.",
                risk.score, concern
            )
        }
        RiskStatus::Fail => format!(
            "Critical AI Risk Score of {:.0}. Immediate action required to address compliance violations.",
            risk.score
        ),
    }
}
