// sentinel-core/src/domain/analysis/drift.rs
//
// Distribution, accuracy and approval-rate shift against a baseline feed.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::dataset::{Dataset, Field};
use crate::domain::error::DomainError;
use crate::domain::policy::DriftPolicy;
use crate::domain::severity::Severity;
use crate::domain::stats::{RunningStats, ks_two_sample};

const ANALYZER: &str = "drift";

/// Numeric features compared between baseline and current.
pub const DRIFT_FEATURES: [Field; 4] = [Field::Age, Field::Income, Field::CreditScore, Field::DebtRatio];

const FEATURE_SCORE_MAX: f64 = 40.0;
const ACCURACY_SCORE_MAX: f64 = 40.0;
const ACCURACY_SCORE_SLOPE: f64 = 4.0;
const PREDICTION_SCORE_MAX: f64 = 20.0;
const PREDICTION_SCORE_SLOPE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsTest {
    pub statistic: f64,
    pub p_value: f64,
    pub drift_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDrift {
    pub feature: Field,
    pub ks_test: KsTest,
    pub baseline_mean: f64,
    pub current_mean: f64,
    pub mean_shift_percent: f64,
    /// Population standard deviations.
    pub baseline_std: f64,
    pub current_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyDrift {
    pub baseline_accuracy: f64,
    pub current_accuracy: f64,
    pub accuracy_drop: f64,
    pub accuracy_drop_percent: f64,
    pub significant_drop: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDrift {
    pub baseline_approval_rate: f64,
    pub current_approval_rate: f64,
    pub rate_change: f64,
    pub rate_change_percent: f64,
    pub significant_change: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftedFeature {
    pub feature: Field,
    pub mean_shift: f64,
    pub ks_statistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    pub score: f64,
    pub severity: Severity,
    pub feature_drift: Vec<FeatureDrift>,
    pub accuracy_drift: AccuracyDrift,
    pub prediction_drift: PredictionDrift,
    pub features_with_drift: usize,
    pub drifted_features: Vec<DriftedFeature>,
    pub explanation: String,
}

/// Relative change in percent; a zero reference yields 0.
fn percent_change(reference: f64, value: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        (value - reference) / reference * 100.0
    }
}

// ── Sub-checks ───────────────────────────────────────────────────────

pub fn feature_drift(
    baseline: &Dataset,
    current: &Dataset,
    policy: &DriftPolicy,
) -> Result<Vec<FeatureDrift>, DomainError> {
    baseline.require(ANALYZER, &DRIFT_FEATURES)?;
    current.require(ANALYZER, &DRIFT_FEATURES)?;
    if baseline.is_empty() {
        return Err(DomainError::EmptyDataset("Baseline".into()));
    }
    if current.is_empty() {
        return Err(DomainError::EmptyDataset("Current".into()));
    }

    let mut results = Vec::with_capacity(DRIFT_FEATURES.len());
    for feature in DRIFT_FEATURES {
        let before = baseline.column(feature);
        let after = current.column(feature);

        let ks = ks_two_sample(&before, &after)
            .ok_or_else(|| DomainError::EmptyDataset(format!("Column '{}'", feature)))?;

        let before_stats: RunningStats = before.iter().copied().collect();
        let after_stats: RunningStats = after.iter().copied().collect();
        let baseline_mean = before_stats.mean().unwrap_or_default();
        let current_mean = after_stats.mean().unwrap_or_default();

        results.push(FeatureDrift {
            feature,
            ks_test: KsTest {
                statistic: ks.statistic,
                p_value: ks.p_value,
                drift_detected: ks.p_value < policy.significance,
            },
            baseline_mean,
            current_mean,
            mean_shift_percent: percent_change(baseline_mean, current_mean),
            baseline_std: before_stats.population_std(),
            current_std: after_stats.population_std(),
        });
    }
    Ok(results)
}

pub fn accuracy_drift(current: &Dataset, policy: &DriftPolicy) -> Result<AccuracyDrift, DomainError> {
    current.require(ANALYZER, &[Field::Prediction, Field::ActualOutcome])?;

    let current_accuracy = current.accuracy();
    let accuracy_drop = policy.baseline_accuracy - current_accuracy;
    Ok(AccuracyDrift {
        baseline_accuracy: policy.baseline_accuracy,
        current_accuracy,
        accuracy_drop,
        accuracy_drop_percent: if policy.baseline_accuracy > 0.0 {
            accuracy_drop / policy.baseline_accuracy * 100.0
        } else {
            0.0
        },
        significant_drop: accuracy_drop > policy.accuracy_drop_threshold,
    })
}

pub fn prediction_drift(
    baseline: &Dataset,
    current: &Dataset,
    policy: &DriftPolicy,
) -> Result<PredictionDrift, DomainError> {
    baseline.require(ANALYZER, &[Field::Prediction])?;
    current.require(ANALYZER, &[Field::Prediction])?;

    let baseline_rate = baseline.approval_rate();
    let current_rate = current.approval_rate();
    let rate_change = current_rate - baseline_rate;
    Ok(PredictionDrift {
        baseline_approval_rate: baseline_rate,
        current_approval_rate: current_rate,
        rate_change,
        rate_change_percent: percent_change(baseline_rate, current_rate),
        significant_change: rate_change.abs() > policy.prediction_change_threshold,
    })
}

// ── Scoring ──────────────────────────────────────────────────────────

/// Feature share (0-40) + accuracy drop (0-40) + approval shift (0-20).
///
/// An accuracy gain makes the accuracy term negative; the total is still
/// clamped into [0, 100].
pub fn composite_drift_score(
    features_with_drift: usize,
    accuracy_drop_percent: f64,
    rate_change_percent: f64,
) -> f64 {
    let feature_score = features_with_drift as f64 / DRIFT_FEATURES.len() as f64 * FEATURE_SCORE_MAX;
    let accuracy_score = (accuracy_drop_percent * ACCURACY_SCORE_SLOPE).min(ACCURACY_SCORE_MAX);
    let prediction_score = (rate_change_percent.abs() * PREDICTION_SCORE_SLOPE).min(PREDICTION_SCORE_MAX);
    (feature_score + accuracy_score + prediction_score).clamp(0.0, 100.0)
}

pub fn drift_severity(score: f64, policy: &DriftPolicy) -> Severity {
    let [low, moderate, high] = policy.bands;
    if score < low {
        Severity::Low
    } else if score < moderate {
        Severity::Moderate
    } else if score < high {
        Severity::High
    } else {
        Severity::Critical
    }
}

fn explain(severity: Severity, features_with_drift: usize, accuracy: &AccuracyDrift) -> String {
    match severity {
        Severity::Low => {
            "Model performance is stable. No significant distribution shift detected.".to_string()
        }
        Severity::Moderate => format!(
            "Minor drift detected. Model accuracy dropped by {:.1}%.",
            accuracy.accuracy_drop_percent
        ),
        Severity::High => format!(
            "Significant drift detected. {} features show distribution shift. Accuracy dropped by {:.1}%.",
            features_with_drift, accuracy.accuracy_drop_percent
        ),
        Severity::Critical => format!(
            "Severe drift detected. {} features show distribution shift and accuracy dropped by {:.1}%. Immediate retraining recommended.",
            features_with_drift, accuracy.accuracy_drop_percent
        ),
    }
}

// ── Analyzer ─────────────────────────────────────────────────────────

pub struct DriftAnalyzer;

impl DriftAnalyzer {
    #[instrument(
        name = "drift_analysis",
        skip_all,
        fields(baseline = baseline.len(), current = current.len())
    )]
    pub fn analyze(
        current: &Dataset,
        baseline: &Dataset,
        policy: &DriftPolicy,
    ) -> Result<DriftResult, DomainError> {
        let feature_drift = feature_drift(baseline, current, policy)?;
        let accuracy_drift = accuracy_drift(current, policy)?;
        let prediction_drift = prediction_drift(baseline, current, policy)?;

        let drifted_features: Vec<DriftedFeature> = feature_drift
            .iter()
            .filter(|f| f.ks_test.drift_detected)
            .map(|f| DriftedFeature {
                feature: f.feature,
                mean_shift: f.mean_shift_percent,
                ks_statistic: f.ks_test.statistic,
            })
            .collect();
        let features_with_drift = drifted_features.len();

        let score = composite_drift_score(
            features_with_drift,
            accuracy_drift.accuracy_drop_percent,
            prediction_drift.rate_change_percent,
        );
        let severity = drift_severity(score, policy);

        if accuracy_drift.significant_drop {
            warn!(
                drop = accuracy_drift.accuracy_drop,
                "Accuracy dropped beyond tolerance"
            );
        }
        debug!(score, %severity, features_with_drift, "Drift analysis complete");

        Ok(DriftResult {
            score,
            severity,
            explanation: explain(severity, features_with_drift, &accuracy_drift),
            feature_drift,
            accuracy_drift,
            prediction_drift,
            features_with_drift,
            drifted_features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Record;
    use approx::assert_abs_diff_eq;

    fn record(i: usize, shift: f64, prediction: u8, actual: u8) -> Record {
        let x = i as f64;
        Record {
            customer_id: format!("CUST_{:06}", i),
            age: 25 + (i % 40) as u32,
            gender: "Male".into(),
            income: 30_000.0 + x * 100.0 + shift * 1_000.0,
            credit_score: 600.0 + x + shift * 100.0,
            employment_type: "Full-time".into(),
            debt_ratio: 0.2 + (i % 10) as f64 / 100.0,
            prediction,
            actual_outcome: actual,
        }
    }

    /// 100 records, half approved, `correct` of them with a matching outcome.
    fn dataset(shift: f64, correct: usize) -> Dataset {
        Dataset::new(
            (0..100)
                .map(|i| {
                    let p = u8::from(i % 2 == 0);
                    let a = if i < correct { p } else { 1 - p };
                    record(i, shift, p, a)
                })
                .collect(),
        )
    }

    #[test]
    fn test_accuracy_drift_scenario() -> anyhow::Result<()> {
        let current = dataset(0.0, 75);
        let drift = accuracy_drift(&current, &DriftPolicy::default())?;

        assert_abs_diff_eq!(drift.current_accuracy, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(drift.accuracy_drop, 0.12, epsilon = 1e-9);
        assert_abs_diff_eq!(drift.accuracy_drop_percent, 13.79, epsilon = 0.01);
        assert!(drift.significant_drop);
        Ok(())
    }

    #[test]
    fn test_identical_feeds_do_not_drift() -> anyhow::Result<()> {
        let baseline = dataset(0.0, 87);
        let result = DriftAnalyzer::analyze(&baseline, &baseline, &DriftPolicy::default())?;

        assert_eq!(result.features_with_drift, 0);
        assert!(result.drifted_features.is_empty());
        for f in &result.feature_drift {
            assert_eq!(f.ks_test.statistic, 0.0);
            assert_eq!(f.ks_test.p_value, 1.0);
            assert_eq!(f.mean_shift_percent, 0.0);
        }
        assert_abs_diff_eq!(result.score, 0.0, epsilon = 1e-9);
        assert_eq!(result.severity, Severity::Low);
        assert!(result.explanation.starts_with("Model performance is stable"));
        Ok(())
    }

    #[test]
    fn test_shifted_feed_flags_features() -> anyhow::Result<()> {
        let baseline = dataset(0.0, 87);
        let current = dataset(5.0, 75);
        let result = DriftAnalyzer::analyze(&current, &baseline, &DriftPolicy::default())?;

        let flagged: Vec<Field> = result.drifted_features.iter().map(|d| d.feature).collect();
        assert!(flagged.contains(&Field::CreditScore));
        assert!(flagged.contains(&Field::Income));
        assert!(!flagged.contains(&Field::Age));
        // 2/4 features (20) + capped accuracy term (40)
        assert_abs_diff_eq!(result.score, 60.0, epsilon = 1e-9);
        assert_eq!(result.severity, Severity::Critical);
        assert!(result.explanation.contains("Immediate retraining"));
        Ok(())
    }

    #[test]
    fn test_prediction_drift() -> anyhow::Result<()> {
        let baseline = dataset(0.0, 100);
        let mut records = baseline.records().to_vec();
        for r in records.iter_mut().take(20) {
            r.prediction = 1;
        }
        let current = Dataset::new(records);
        let drift = prediction_drift(&baseline, &current, &DriftPolicy::default())?;

        assert_abs_diff_eq!(drift.rate_change, 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(drift.rate_change_percent, 20.0, epsilon = 1e-9);
        assert!(drift.significant_change);
        Ok(())
    }

    #[test]
    fn test_empty_baseline_is_an_error() {
        let current = dataset(0.0, 87);
        let empty = Dataset::new(Vec::new());
        let res = DriftAnalyzer::analyze(&current, &empty, &DriftPolicy::default());
        assert!(matches!(res, Err(DomainError::EmptyDataset(_))));
    }

    #[test]
    fn test_score_components() {
        assert_abs_diff_eq!(composite_drift_score(4, 100.0, -50.0), 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(composite_drift_score(1, 2.0, 3.0), 10.0 + 8.0 + 6.0, epsilon = 1e-12);
        // Accuracy gains can pull the total down but never below zero
        assert_eq!(composite_drift_score(0, -20.0, 0.0), 0.0);
    }

    #[test]
    fn test_severity_bands() {
        let p = DriftPolicy::default();
        assert_eq!(drift_severity(19.9, &p), Severity::Low);
        assert_eq!(drift_severity(20.0, &p), Severity::Moderate);
        assert_eq!(drift_severity(40.0, &p), Severity::High);
        assert_eq!(drift_severity(60.0, &p), Severity::Critical);
    }

    #[test]
    fn test_zero_baseline_mean_gives_zero_shift() {
        assert_eq!(percent_change(0.0, 5.0), 0.0);
        assert_eq!(percent_change(10.0, 15.0), 50.0);
    }
}
