// sentinel-core/src/domain/risk/recommendation.rs
//
// Rule-based remediation advice. Every rule is checked independently and
// any number of them may fire.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::domain::analysis::{
    BiasResult, DriftResult, ExplainabilityGap, ExplainabilityResult, ViolationKind,
};
use crate::domain::policy::RiskPolicy;
use crate::domain::severity::{Level, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bias,
    Drift,
    Explainability,
    Overall,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bias => "Bias",
            Self::Drift => "Drift",
            Self::Explainability => "Explainability",
            Self::Overall => "Overall",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub severity: Severity,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub action: String,
    pub impact: Level,
    pub effort: Level,
}

/// Static part of a rule's output.
struct Template {
    id: &'static str,
    severity: Severity,
    category: Category,
    title: &'static str,
    description: &'static str,
    action: &'static str,
    impact: Level,
    effort: Level,
}

impl Template {
    fn build(&self) -> Recommendation {
        self.describe(self.description.to_string())
    }

    fn describe(&self, description: String) -> Recommendation {
        Recommendation {
            id: self.id.to_string(),
            severity: self.severity,
            category: self.category,
            title: self.title.to_string(),
            description,
            action: self.action.to_string(),
            impact: self.impact,
            effort: self.effort,
        }
    }
}

// --- BIAS ---

const BIAS_RETRAIN: Template = Template {
    id: "BIAS_001",
    severity: Severity::Critical,
    category: Category::Bias,
    title: "Immediate Model Retraining Required",
    description: "Disparate Impact ratio is below regulatory threshold. Retrain model with balanced demographic data.",
    action: "Schedule emergency review with ML team within 48 hours",
    impact: Level::High,
    effort: Level::High,
};

const BIAS_GENDER_DISPARITY: Template = Template {
    id: "BIAS_002",
    severity: Severity::Critical,
    category: Category::Bias,
    title: "Address Gender-Based Approval Disparity",
    description: "",
    action: "Conduct feature audit to identify proxy variables",
    impact: Level::High,
    effort: Level::Medium,
};

const BIAS_INCOME_PROXY: Template = Template {
    id: "BIAS_003",
    severity: Severity::High,
    category: Category::Bias,
    title: "Remove Income Proxy Bias",
    description: "Income feature may be acting as a proxy for protected characteristics.",
    action: "Consider removing or re-weighting income feature in model",
    impact: Level::Medium,
    effort: Level::Medium,
};

const BIAS_MONITORING: Template = Template {
    id: "BIAS_004",
    severity: Severity::Moderate,
    category: Category::Bias,
    title: "Implement Bias Monitoring",
    description: "Moderate bias detected. Set up continuous monitoring for approval rate disparities.",
    action: "Configure weekly bias reports by demographic group",
    impact: Level::Medium,
    effort: Level::Low,
};

// --- DRIFT ---

const DRIFT_RETRAIN: Template = Template {
    id: "DRIFT_001",
    severity: Severity::Critical,
    category: Category::Drift,
    title: "Immediate Model Retraining Required",
    description: "",
    action: "Schedule model retraining with current data distribution within 7 days",
    impact: Level::High,
    effort: Level::High,
};

const DRIFT_FEATURE_SHIFT: Template = Template {
    id: "DRIFT_002",
    severity: Severity::High,
    category: Category::Drift,
    title: "Feature Distribution Shift Detected",
    description: "",
    action: "Investigate root cause of distribution changes (market shift, data quality, etc.)",
    impact: Level::High,
    effort: Level::Medium,
};

const DRIFT_DEGRADATION: Template = Template {
    id: "DRIFT_003",
    severity: Severity::High,
    category: Category::Drift,
    title: "Model Performance Degradation",
    description: "",
    action: "Evaluate if model assumptions still hold with current data",
    impact: Level::High,
    effort: Level::Medium,
};

const DRIFT_PROACTIVE: Template = Template {
    id: "DRIFT_004",
    severity: Severity::Moderate,
    category: Category::Drift,
    title: "Schedule Proactive Retraining",
    description: "Moderate drift detected. Plan for model retraining to prevent further degradation.",
    action: "Schedule retraining within 14 days",
    impact: Level::Medium,
    effort: Level::Medium,
};

// --- EXPLAINABILITY ---

const EXPLAIN_DOCUMENTATION: Template = Template {
    id: "EXPLAIN_001",
    severity: Severity::High,
    category: Category::Explainability,
    title: "Improve Model Documentation",
    description: "Model lacks sufficient documentation for regulatory compliance.",
    action: "Create comprehensive model card with feature importance and decision logic",
    impact: Level::High,
    effort: Level::Medium,
};

const EXPLAIN_FEATURE_IMPORTANCE: Template = Template {
    id: "EXPLAIN_002",
    severity: Severity::Moderate,
    category: Category::Explainability,
    title: "Document Feature Importance",
    description: "Feature importance rankings are not fully documented.",
    action: "Generate SHAP values and document feature contributions",
    impact: Level::Medium,
    effort: Level::Low,
};

const EXPLAIN_BOUNDARIES: Template = Template {
    id: "EXPLAIN_003",
    severity: Severity::Moderate,
    category: Category::Explainability,
    title: "Clarify Decision Boundaries",
    description: "Many predictions are near the decision boundary, making explanations difficult.",
    action: "Consider implementing confidence thresholds for marginal cases",
    impact: Level::Medium,
    effort: Level::Medium,
};

// --- OVERALL ---

const GENERAL_AT_RISK: Template = Template {
    id: "GENERAL_001",
    severity: Severity::Critical,
    category: Category::Overall,
    title: "Model Deployment at Risk",
    description: "AI Risk Score exceeds acceptable threshold. Consider temporary model suspension.",
    action: "Convene risk committee to evaluate continued deployment",
    impact: Level::Critical,
    effort: Level::High,
};

const GENERAL_MONITORING: Template = Template {
    id: "GENERAL_002",
    severity: Severity::Moderate,
    category: Category::Overall,
    title: "Increase Monitoring Frequency",
    description: "Elevated risk score detected. Increase audit frequency.",
    action: "Switch from weekly to daily monitoring",
    impact: Level::Medium,
    effort: Level::Low,
};

// ── Rules ────────────────────────────────────────────────────────────

pub fn bias_recommendations(bias: &BiasResult, policy: &RiskPolicy) -> Vec<Recommendation> {
    let thresholds = &policy.recommendations;
    let mut out = Vec::new();

    if bias.score > thresholds.bias_critical {
        out.push(BIAS_RETRAIN.build());
    }
    if bias
        .violations
        .iter()
        .any(|v| v.kind == ViolationKind::GenderDisparateImpact)
    {
        out.push(BIAS_GENDER_DISPARITY.describe(format!(
            "{} applicants have significantly lower approval rates. Review feature weights and remove any gender-correlated proxies.",
            policy.bias.gender.unprivileged
        )));
    }
    if bias.income_proxy.proxy_detected {
        out.push(BIAS_INCOME_PROXY.build());
    }
    if bias.score > thresholds.bias_monitor && bias.score <= thresholds.bias_critical {
        out.push(BIAS_MONITORING.build());
    }
    out
}

pub fn drift_recommendations(drift: &DriftResult, policy: &RiskPolicy) -> Vec<Recommendation> {
    let thresholds = &policy.recommendations;
    let accuracy = &drift.accuracy_drift;
    let mut out = Vec::new();

    if drift.score > thresholds.drift_critical {
        out.push(DRIFT_RETRAIN.describe(format!(
            "Model accuracy has dropped by {:.1}%. Data distribution has shifted significantly.",
            accuracy.accuracy_drop_percent
        )));
    }
    if !drift.drifted_features.is_empty() {
        let names: Vec<&str> = drift
            .drifted_features
            .iter()
            .map(|f| f.feature.as_str())
            .collect();
        out.push(DRIFT_FEATURE_SHIFT.describe(format!(
            "Significant distribution shift in: {}",
            names.join(", ")
        )));
    }
    if accuracy.significant_drop {
        out.push(DRIFT_DEGRADATION.describe(format!(
            "Accuracy dropped from {:.1}% to {:.1}%",
            accuracy.baseline_accuracy * 100.0,
            accuracy.current_accuracy * 100.0
        )));
    }
    if drift.score > thresholds.drift_proactive && drift.score <= thresholds.drift_critical {
        out.push(DRIFT_PROACTIVE.build());
    }
    out
}

pub fn explainability_recommendations(
    explainability: &ExplainabilityResult,
    policy: &RiskPolicy,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if explainability.score < policy.recommendations.explainability_floor {
        out.push(EXPLAIN_DOCUMENTATION.build());
    }
    if explainability.gaps.contains(&ExplainabilityGap::FeatureDocumentation) {
        out.push(EXPLAIN_FEATURE_IMPORTANCE.build());
    }
    if explainability.gaps.contains(&ExplainabilityGap::DecisionBoundaries) {
        out.push(EXPLAIN_BOUNDARIES.build());
    }
    out
}

/// All rule outputs, deduplicated by id and sorted Critical first.
///
/// The overall item goes in front when the composite is critical and at the
/// back when merely elevated; the sort is stable so category grouping
/// survives within each severity.
pub fn generate_recommendations(
    bias: &BiasResult,
    drift: &DriftResult,
    explainability: &ExplainabilityResult,
    ai_risk_score: f64,
    policy: &RiskPolicy,
) -> Vec<Recommendation> {
    let thresholds = &policy.recommendations;
    let mut all = Vec::new();

    if ai_risk_score > thresholds.overall_critical {
        all.push(GENERAL_AT_RISK.build());
    }
    all.extend(bias_recommendations(bias, policy));
    all.extend(drift_recommendations(drift, policy));
    all.extend(explainability_recommendations(explainability, policy));
    if ai_risk_score <= thresholds.overall_critical && ai_risk_score > thresholds.overall_elevated {
        all.push(GENERAL_MONITORING.build());
    }

    let mut seen = HashSet::new();
    all.retain(|r| seen.insert(r.id.clone()));
    all.sort_by_key(|r| r.severity);

    debug!(count = all.len(), "Recommendations generated");
    all
}
