// sentinel-core/src/domain/policy.rs
//
// Every tunable threshold, band and weight of the risk engine. The scoring
// code reads these and never hardcodes them.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct RiskPolicy {
    #[validate(nested)]
    pub bias: BiasPolicy,
    #[validate(nested)]
    pub drift: DriftPolicy,
    #[validate(nested)]
    pub explainability: ExplainabilityPolicy,
    #[validate(nested)]
    pub aggregate: AggregatePolicy,
    #[validate(nested)]
    pub recommendations: RecommendationPolicy,
}

impl RiskPolicy {
    /// Runs the validator rules and converts failures into a domain error.
    pub fn validated(self) -> Result<Self, DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidPolicy(e.to_string()))?;
        Ok(self)
    }
}

// --- BIAS ---

/// Gender roles are a fixed domain convention, never inferred from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PrivilegeConvention {
    #[validate(length(min = 1))]
    pub privileged: String,
    #[validate(length(min = 1))]
    pub unprivileged: String,
}

impl Default for PrivilegeConvention {
    fn default() -> Self {
        Self {
            privileged: "Male".to_string(),
            unprivileged: "Female".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBin {
    pub label: String,
    pub min: u32,
    pub max: u32,
}

impl AgeBin {
    pub fn new(label: &str, min: u32, max: u32) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_bias_policy"))]
pub struct BiasPolicy {
    /// The "80% rule".
    #[validate(range(min = 0.0, max = 1.0))]
    pub di_threshold: f64,
    /// Gender DI below this is a Critical violation, otherwise High.
    #[validate(range(min = 0.0, max = 1.0))]
    pub critical_di: f64,
    /// Denied-female mean income above denied-male mean by more than this fraction flags a proxy.
    #[validate(range(min = 0.0))]
    pub proxy_income_margin: f64,
    #[validate(nested)]
    pub gender: PrivilegeConvention,
    pub age_bins: Vec<AgeBin>,
    pub gender_weight: f64,
    pub age_weight: f64,
    pub proxy_weight: f64,
    /// Explanation bands: below each bound the next wording applies.
    pub bands: [f64; 3],
}

impl Default for BiasPolicy {
    fn default() -> Self {
        Self {
            di_threshold: 0.8,
            critical_di: 0.7,
            proxy_income_margin: 0.10,
            gender: PrivilegeConvention::default(),
            age_bins: vec![
                AgeBin::new("18-30", 18, 30),
                AgeBin::new("31-45", 31, 45),
                AgeBin::new("46-60", 46, 60),
                AgeBin::new("60+", 61, 100),
            ],
            gender_weight: 0.6,
            age_weight: 0.25,
            proxy_weight: 0.15,
            bands: [20.0, 50.0, 75.0],
        }
    }
}

fn validate_bias_policy(p: &BiasPolicy) -> Result<(), ValidationError> {
    if p.critical_di > p.di_threshold {
        return Err(ValidationError::new("critical_di_above_threshold"));
    }
    if p.age_bins.is_empty() || p.age_bins.iter().any(|b| b.min > b.max) {
        return Err(ValidationError::new("invalid_age_bins"));
    }
    if p.gender.privileged == p.gender.unprivileged {
        return Err(ValidationError::new("identical_gender_roles"));
    }
    check_weights(&[p.gender_weight, p.age_weight, p.proxy_weight])?;
    check_ascending(&p.bands)
}

// --- DRIFT ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_drift_policy"))]
pub struct DriftPolicy {
    /// KS p-value below which a feature is flagged.
    #[validate(range(min = 0.0, max = 1.0))]
    pub significance: f64,
    /// Validated model accuracy the current accuracy is compared with.
    #[validate(range(min = 0.0, max = 1.0))]
    pub baseline_accuracy: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub accuracy_drop_threshold: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub prediction_change_threshold: f64,
    /// Low / Moderate / High upper bounds; anything above is Critical.
    pub bands: [f64; 3],
}

impl Default for DriftPolicy {
    fn default() -> Self {
        Self {
            significance: 0.05,
            baseline_accuracy: 0.87,
            accuracy_drop_threshold: 0.05,
            prediction_change_threshold: 0.05,
            bands: [20.0, 40.0, 60.0],
        }
    }
}

fn validate_drift_policy(p: &DriftPolicy) -> Result<(), ValidationError> {
    if p.baseline_accuracy <= 0.0 {
        return Err(ValidationError::new("baseline_accuracy_not_positive"));
    }
    check_ascending(&p.bands)
}

// --- EXPLAINABILITY ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_explainability_policy"))]
pub struct ExplainabilityPolicy {
    /// Open interval of approval likelihoods considered hard to explain.
    pub boundary_window: (f64, f64),
    /// Minimum distinct-value ratio for a categorical feature to count as varying.
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_unique_ratio: f64,
    pub documentation_weight: f64,
    pub clarity_weight: f64,
    pub audit_trail_weight: f64,
    pub required_fields_weight: f64,
    pub optional_fields_weight: f64,
    pub documentation_gap: f64,
    pub clarity_gap: f64,
    pub audit_trail_gap: f64,
    /// Excellent / Good / Moderate lower bounds (strict), descending.
    pub bands: [f64; 3],
}

impl Default for ExplainabilityPolicy {
    fn default() -> Self {
        Self {
            boundary_window: (0.4, 0.6),
            min_unique_ratio: 0.01,
            documentation_weight: 0.4,
            clarity_weight: 0.35,
            audit_trail_weight: 0.25,
            required_fields_weight: 0.7,
            optional_fields_weight: 0.3,
            documentation_gap: 80.0,
            clarity_gap: 60.0,
            audit_trail_gap: 90.0,
            bands: [80.0, 60.0, 40.0],
        }
    }
}

fn validate_explainability_policy(p: &ExplainabilityPolicy) -> Result<(), ValidationError> {
    if p.boundary_window.0 >= p.boundary_window.1 {
        return Err(ValidationError::new("empty_boundary_window"));
    }
    check_weights(&[p.documentation_weight, p.clarity_weight, p.audit_trail_weight])?;
    check_weights(&[p.required_fields_weight, p.optional_fields_weight])?;
    let [a, b, c] = p.bands;
    if !(a > b && b > c) {
        return Err(ValidationError::new("bands_not_descending"));
    }
    Ok(())
}

// --- COMPOSITE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_aggregate_policy"))]
pub struct AggregatePolicy {
    pub bias_weight: f64,
    pub drift_weight: f64,
    pub explainability_weight: f64,
    /// Scores up to and including this are PASS.
    pub pass_ceiling: f64,
    /// Scores up to and including this (and above PASS) are WARNING.
    pub warning_ceiling: f64,
}

impl Default for AggregatePolicy {
    fn default() -> Self {
        Self {
            bias_weight: 0.40,
            drift_weight: 0.35,
            explainability_weight: 0.25,
            pass_ceiling: 40.0,
            warning_ceiling: 70.0,
        }
    }
}

fn validate_aggregate_policy(p: &AggregatePolicy) -> Result<(), ValidationError> {
    check_weights(&[p.bias_weight, p.drift_weight, p.explainability_weight])?;
    check_ascending(&[p.pass_ceiling, p.warning_ceiling])
}

// --- RECOMMENDATIONS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Bias score above this triggers emergency retraining.
    pub bias_critical: f64,
    /// Bias score in (bias_monitor, bias_critical] triggers monitoring.
    pub bias_monitor: f64,
    pub drift_critical: f64,
    pub drift_proactive: f64,
    /// Explainability score below this triggers documentation work.
    pub explainability_floor: f64,
    pub overall_critical: f64,
    pub overall_elevated: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            bias_critical: 70.0,
            bias_monitor: 40.0,
            drift_critical: 60.0,
            drift_proactive: 30.0,
            explainability_floor: 60.0,
            overall_critical: 70.0,
            overall_elevated: 50.0,
        }
    }
}

// --- HELPERS ---

fn check_weights(weights: &[f64]) -> Result<(), ValidationError> {
    if weights.iter().any(|w| *w < 0.0) {
        return Err(ValidationError::new("negative_weight"));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > 1e-6 {
        return Err(ValidationError::new("weights_do_not_sum_to_one"));
    }
    Ok(())
}

fn check_ascending(bounds: &[f64]) -> Result<(), ValidationError> {
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ValidationError::new("bands_not_ascending"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(RiskPolicy::default().validated().is_ok());
    }

    #[test]
    fn test_default_constants() {
        let p = RiskPolicy::default();
        assert_eq!(p.bias.di_threshold, 0.8);
        assert_eq!(p.bias.gender.privileged, "Male");
        assert_eq!(p.drift.baseline_accuracy, 0.87);
        assert_eq!(p.explainability.boundary_window, (0.4, 0.6));
        assert_eq!(p.aggregate.pass_ceiling, 40.0);
        assert_eq!(p.aggregate.warning_ceiling, 70.0);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut p = RiskPolicy::default();
        p.aggregate.bias_weight = 0.9;
        assert!(matches!(p.validated(), Err(DomainError::InvalidPolicy(_))));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut p = RiskPolicy::default();
        p.drift.significance = 1.5;
        assert!(p.validated().is_err());
    }

    #[test]
    fn test_critical_di_must_not_exceed_threshold() {
        let mut p = RiskPolicy::default();
        p.bias.critical_di = 0.9;
        assert!(p.validated().is_err());
    }

    #[test]
    fn test_identical_gender_roles_rejected() {
        let mut p = RiskPolicy::default();
        p.bias.gender.unprivileged = "Male".into();
        assert!(p.validated().is_err());
    }

    #[test]
    fn test_age_bins() {
        let bin = AgeBin::new("18-30", 18, 30);
        assert!(bin.contains(18));
        assert!(bin.contains(30));
        assert!(!bin.contains(31));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let yaml = "bias:\n  di_threshold: 0.75\n";
        let p: RiskPolicy = serde_yaml::from_str(yaml)?;
        assert_eq!(p.bias.di_threshold, 0.75);
        assert_eq!(p.bias.critical_di, 0.7);
        assert_eq!(p.drift, DriftPolicy::default());
        Ok(())
    }
}
