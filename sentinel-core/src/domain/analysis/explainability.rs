// sentinel-core/src/domain/analysis/explainability.rs
//
// How well the decision model can be documented and explained. Unlike the
// other analyzers, a higher score here is better.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::domain::dataset::{Dataset, Field, FieldKind};
use crate::domain::error::DomainError;
use crate::domain::policy::ExplainabilityPolicy;
use crate::domain::stats::{RunningStats, factorize, pearson};

const ANALYZER: &str = "explainability";

/// Features whose influence a model card is expected to document.
pub const KEY_FEATURES: [Field; 5] = [
    Field::Age,
    Field::Income,
    Field::CreditScore,
    Field::DebtRatio,
    Field::EmploymentType,
];

pub const REQUIRED_AUDIT_FIELDS: [Field; 3] = [Field::CustomerId, Field::Prediction, Field::ActualOutcome];

pub const OPTIONAL_AUDIT_FIELDS: [Field; 6] = [
    Field::Age,
    Field::Gender,
    Field::Income,
    Field::CreditScore,
    Field::EmploymentType,
    Field::DebtRatio,
];

/// Inputs of the approval-likelihood formula.
const LIKELIHOOD_INPUTS: [Field; 4] = [
    Field::CreditScore,
    Field::Income,
    Field::DebtRatio,
    Field::EmploymentType,
];

const CLEAR_ABOVE: f64 = 70.0;
const MODERATE_ABOVE: f64 = 50.0;

// ── Result Structures ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInsight {
    pub feature: Field,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_variation: Option<bool>,
    /// |correlation| with the prediction, 0 when undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence_score: Option<f64>,
    /// Presence stands in for a model-card lookup.
    pub documented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCoverage {
    pub features: Vec<FeatureInsight>,
    pub documentation_coverage: f64,
    pub documented_features: usize,
    pub total_features: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    Clear,
    Moderate,
    Unclear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transparency {
    pub clarity_score: f64,
    pub near_boundary_percent: f64,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    pub required_fields_coverage: f64,
    pub optional_fields_coverage: f64,
    pub total_coverage: f64,
    pub missing_required: Vec<Field>,
    pub missing_optional: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplainabilityGap {
    #[serde(rename = "Feature importance documentation incomplete")]
    FeatureDocumentation,
    #[serde(rename = "Decision boundaries are unclear")]
    DecisionBoundaries,
    #[serde(rename = "Audit trail coverage is insufficient")]
    AuditTrail,
}

impl ExplainabilityGap {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeatureDocumentation => "Feature importance documentation incomplete",
            Self::DecisionBoundaries => "Decision boundaries are unclear",
            Self::AuditTrail => "Audit trail coverage is insufficient",
        }
    }
}

impl std::fmt::Display for ExplainabilityGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainabilityResult {
    pub score: f64,
    pub feature_coverage: FeatureCoverage,
    pub transparency: Transparency,
    pub audit_trail: AuditTrail,
    pub gaps: Vec<ExplainabilityGap>,
    pub explanation: String,
}

// ── Sub-checks ───────────────────────────────────────────────────────

fn insight(dataset: &Dataset, feature: Field, predictions: &[f64], policy: &ExplainabilityPolicy) -> FeatureInsight {
    let (has_variation, influence) = if feature.kind() == FieldKind::Categorical {
        let values: Vec<&str> = dataset
            .records()
            .iter()
            .filter_map(|r| r.category(feature))
            .collect();
        let distinct = values.iter().collect::<HashSet<_>>().len();
        let unique_ratio = if values.is_empty() {
            0.0
        } else {
            distinct as f64 / values.len() as f64
        };
        (
            unique_ratio > policy.min_unique_ratio,
            pearson(&factorize(values), predictions),
        )
    } else {
        let values = dataset.column(feature);
        let variance = values.iter().copied().collect::<RunningStats>().sample_variance();
        (
            variance.is_some_and(|v| v > 0.0),
            pearson(&values, predictions),
        )
    };

    FeatureInsight {
        feature,
        present: true,
        has_variation: Some(has_variation),
        influence_score: Some(influence.map_or(0.0, f64::abs)),
        documented: true,
    }
}

pub fn feature_coverage(
    dataset: &Dataset,
    policy: &ExplainabilityPolicy,
) -> Result<FeatureCoverage, DomainError> {
    let present = KEY_FEATURES.iter().filter(|f| dataset.has(**f)).count();
    if present > 0 {
        dataset.require(ANALYZER, &[Field::Prediction])?;
    }
    let predictions = dataset.column(Field::Prediction);

    let features: Vec<FeatureInsight> = KEY_FEATURES
        .into_iter()
        .map(|feature| {
            if dataset.has(feature) {
                insight(dataset, feature, &predictions, policy)
            } else {
                FeatureInsight {
                    feature,
                    present: false,
                    has_variation: None,
                    influence_score: None,
                    documented: false,
                }
            }
        })
        .collect();

    let documented_features = features.iter().filter(|f| f.documented).count();
    Ok(FeatureCoverage {
        documentation_coverage: documented_features as f64 / KEY_FEATURES.len() as f64 * 100.0,
        documented_features,
        total_features: KEY_FEATURES.len(),
        features,
    })
}

pub fn transparency(
    dataset: &Dataset,
    policy: &ExplainabilityPolicy,
) -> Result<Transparency, DomainError> {
    dataset.require(ANALYZER, &LIKELIHOOD_INPUTS)?;

    let (low, high) = policy.boundary_window;
    // Unmapped employment types have no likelihood and are never near the
    // boundary, but still count in the denominator.
    let near = dataset
        .records()
        .iter()
        .filter_map(|r| r.approval_likelihood())
        .filter(|score| *score > low && *score < high)
        .count();
    let near_boundary = if dataset.is_empty() {
        0.0
    } else {
        near as f64 / dataset.len() as f64
    };

    let clarity_score = (1.0 - near_boundary) * 100.0;
    let interpretation = if clarity_score > CLEAR_ABOVE {
        Interpretation::Clear
    } else if clarity_score > MODERATE_ABOVE {
        Interpretation::Moderate
    } else {
        Interpretation::Unclear
    };

    Ok(Transparency {
        clarity_score,
        near_boundary_percent: near_boundary * 100.0,
        interpretation,
    })
}

pub fn audit_trail(dataset: &Dataset, policy: &ExplainabilityPolicy) -> AuditTrail {
    let missing = |fields: &[Field]| -> Vec<Field> {
        fields.iter().copied().filter(|f| !dataset.has(*f)).collect()
    };
    let missing_required = missing(&REQUIRED_AUDIT_FIELDS[..]);
    let missing_optional = missing(&OPTIONAL_AUDIT_FIELDS[..]);

    let coverage = |missing: usize, total: usize| (total - missing) as f64 / total as f64 * 100.0;
    let required = coverage(missing_required.len(), REQUIRED_AUDIT_FIELDS.len());
    let optional = coverage(missing_optional.len(), OPTIONAL_AUDIT_FIELDS.len());

    AuditTrail {
        required_fields_coverage: required,
        optional_fields_coverage: optional,
        total_coverage: required * policy.required_fields_weight
            + optional * policy.optional_fields_weight,
        missing_required,
        missing_optional,
    }
}

// ── Scoring ──────────────────────────────────────────────────────────

pub fn composite_explainability_score(
    documentation: f64,
    clarity: f64,
    audit_trail: f64,
    policy: &ExplainabilityPolicy,
) -> f64 {
    (policy.documentation_weight * documentation
        + policy.clarity_weight * clarity
        + policy.audit_trail_weight * audit_trail)
        .clamp(0.0, 100.0)
}

fn explain(score: f64, policy: &ExplainabilityPolicy) -> &'static str {
    let [excellent, good, moderate] = policy.bands;
    if score > excellent {
        "Excellent explainability. Model decisions are well-documented and transparent."
    } else if score > good {
        "Good explainability. Most model decisions can be explained to stakeholders."
    } else if score > moderate {
        "Moderate explainability. Some decisions may be difficult to explain to regulators."
    } else {
        "Poor explainability. Model lacks transparency required for regulatory compliance."
    }
}

// ── Analyzer ─────────────────────────────────────────────────────────

pub struct ExplainabilityAnalyzer;

impl ExplainabilityAnalyzer {
    #[instrument(name = "explainability_analysis", skip_all, fields(records = dataset.len()))]
    pub fn analyze(
        dataset: &Dataset,
        policy: &ExplainabilityPolicy,
    ) -> Result<ExplainabilityResult, DomainError> {
        let feature_coverage = feature_coverage(dataset, policy)?;
        let transparency = transparency(dataset, policy)?;
        let audit_trail = audit_trail(dataset, policy);

        let score = composite_explainability_score(
            feature_coverage.documentation_coverage,
            transparency.clarity_score,
            audit_trail.total_coverage,
            policy,
        );

        let mut gaps = Vec::new();
        if feature_coverage.documentation_coverage < policy.documentation_gap {
            gaps.push(ExplainabilityGap::FeatureDocumentation);
        }
        if transparency.clarity_score < policy.clarity_gap {
            gaps.push(ExplainabilityGap::DecisionBoundaries);
        }
        if audit_trail.total_coverage < policy.audit_trail_gap {
            gaps.push(ExplainabilityGap::AuditTrail);
        }
        debug!(score, gaps = gaps.len(), "Explainability analysis complete");

        Ok(ExplainabilityResult {
            score,
            explanation: explain(score, policy).to_string(),
            feature_coverage,
            transparency,
            audit_trail,
            gaps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Record;
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeSet;

    fn record(i: usize, credit_score: f64, employment: &str) -> Record {
        Record {
            customer_id: format!("CUST_{:06}", i),
            age: 20 + (i % 50) as u32,
            gender: if i % 2 == 0 { "Male" } else { "Female" }.into(),
            income: 40_000.0 + i as f64 * 500.0,
            credit_score,
            employment_type: employment.into(),
            debt_ratio: 0.3,
            prediction: u8::from(credit_score > 650.0),
            actual_outcome: u8::from(credit_score > 650.0),
        }
    }

    /// Likelihoods far from the 0.4-0.6 window: strong and weak applicants.
    fn polarized(n: usize) -> Dataset {
        Dataset::new(
            (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        record(i, 840.0, "Full-time")
                    } else {
                        record(i, 310.0, "Unemployed")
                    }
                })
                .collect(),
        )
    }

    fn without(columns: &[Field], records: Vec<Record>) -> Dataset {
        let kept: BTreeSet<Field> = Field::ALL
            .into_iter()
            .filter(|f| !columns.contains(f))
            .collect();
        Dataset::with_columns(records, kept)
    }

    #[test]
    fn test_full_schema_is_fully_documented() -> anyhow::Result<()> {
        let ds = polarized(40);
        let coverage = feature_coverage(&ds, &ExplainabilityPolicy::default())?;

        assert_eq!(coverage.documentation_coverage, 100.0);
        assert_eq!(coverage.documented_features, 5);
        let credit = coverage
            .features
            .iter()
            .find(|f| f.feature == Field::CreditScore)
            .ok_or_else(|| anyhow::anyhow!("credit_score missing"))?;
        assert_eq!(credit.has_variation, Some(true));
        // Prediction is a step function of credit score here
        assert_abs_diff_eq!(credit.influence_score.unwrap_or_default(), 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_constant_feature_has_no_influence() -> anyhow::Result<()> {
        let ds = polarized(40);
        let coverage = feature_coverage(&ds, &ExplainabilityPolicy::default())?;
        let debt = coverage
            .features
            .iter()
            .find(|f| f.feature == Field::DebtRatio)
            .ok_or_else(|| anyhow::anyhow!("debt_ratio missing"))?;
        assert_eq!(debt.has_variation, Some(false));
        assert_eq!(debt.influence_score, Some(0.0));
        Ok(())
    }

    #[test]
    fn test_polarized_decisions_are_clear() -> anyhow::Result<()> {
        let t = transparency(&polarized(40), &ExplainabilityPolicy::default())?;
        assert_eq!(t.near_boundary_percent, 0.0);
        assert_eq!(t.clarity_score, 100.0);
        assert_eq!(t.interpretation, Interpretation::Clear);
        Ok(())
    }

    #[test]
    fn test_borderline_decisions_are_unclear() -> anyhow::Result<()> {
        // credit 575, income 40k-ish, debt 0.3, part-time: likelihood ~0.49
        let ds = Dataset::new((0..10).map(|i| record(i, 575.0, "Part-time")).collect());
        let policy = ExplainabilityPolicy::default();
        let t = transparency(&ds, &policy)?;
        assert_eq!(t.near_boundary_percent, 100.0);
        assert_eq!(t.interpretation, Interpretation::Unclear);

        let result = ExplainabilityAnalyzer::analyze(&ds, &policy)?;
        assert_eq!(result.gaps, vec![ExplainabilityGap::DecisionBoundaries]);
        // 0.4*100 + 0.35*0 + 0.25*100
        assert_abs_diff_eq!(result.score, 65.0, epsilon = 1e-9);
        assert!(result.explanation.starts_with("Good explainability"));
        Ok(())
    }

    #[test]
    fn test_unmapped_employment_is_not_near_boundary() -> anyhow::Result<()> {
        let ds = Dataset::new(vec![record(0, 575.0, "Retired"), record(1, 575.0, "Part-time")]);
        let t = transparency(&ds, &ExplainabilityPolicy::default())?;
        assert_eq!(t.near_boundary_percent, 50.0);
        Ok(())
    }

    #[test]
    fn test_audit_trail_missing_fields() {
        let ds = without(&[Field::CustomerId, Field::Gender], polarized(4).records().to_vec());
        let trail = audit_trail(&ds, &ExplainabilityPolicy::default());

        assert_eq!(trail.missing_required, vec![Field::CustomerId]);
        assert_eq!(trail.missing_optional, vec![Field::Gender]);
        assert_abs_diff_eq!(
            trail.total_coverage,
            (2.0 / 3.0 * 100.0) * 0.7 + (5.0 / 6.0 * 100.0) * 0.3,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_missing_key_feature_lowers_documentation() -> anyhow::Result<()> {
        let ds = without(&[Field::Age], polarized(20).records().to_vec());
        let policy = ExplainabilityPolicy::default();
        let result = ExplainabilityAnalyzer::analyze(&ds, &policy)?;

        assert_eq!(result.feature_coverage.documentation_coverage, 80.0);
        let age = &result.feature_coverage.features[0];
        assert!(!age.present && !age.documented);
        // Audit trail: 100*0.7 + (5/6*100)*0.3 = 95
        assert!(result.gaps.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_formula_input_is_fatal() {
        let ds = without(&[Field::CreditScore], polarized(4).records().to_vec());
        let res = ExplainabilityAnalyzer::analyze(&ds, &ExplainabilityPolicy::default());
        assert!(matches!(res, Err(DomainError::MissingColumn { .. })));
    }

    #[test]
    fn test_gap_serializes_as_message() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_string(&ExplainabilityGap::AuditTrail)?,
            "\"Audit trail coverage is insufficient\""
        );
        Ok(())
    }
}
