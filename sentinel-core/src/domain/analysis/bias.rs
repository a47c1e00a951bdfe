// sentinel-core/src/domain/analysis/bias.rs
//
// Demographic fairness checks: disparate impact, age-group disparity and
// income acting as a gender proxy.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::analysis::violation::{Violation, ViolationKind};
use crate::domain::dataset::{Dataset, Field, FieldKind};
use crate::domain::error::DomainError;
use crate::domain::policy::{BiasPolicy, PrivilegeConvention};
use crate::domain::severity::Severity;
use crate::domain::stats::{RunningStats, extremes, filtered_mean, group_means};

const ANALYZER: &str = "bias";

/// Gender risk once the DI ratio drops below threshold starts here...
const VIOLATION_BASE_RISK: f64 = 50.0;
/// ...and grows by this much per unit of ratio below threshold.
const VIOLATION_SLOPE: f64 = 200.0;
/// Residual gender risk per unit of ratio below parity, above threshold.
const RESIDUAL_SLOPE: f64 = 20.0;
const PROXY_RISK: f64 = 20.0;

// ── Result Structures ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisparateImpact {
    pub attribute: Field,
    /// unprivileged_rate / privileged_rate
    pub ratio: f64,
    pub violation: bool,
    pub privileged_group: Option<String>,
    pub privileged_rate: f64,
    pub unprivileged_group: Option<String>,
    pub unprivileged_rate: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRate {
    pub group: String,
    pub rate: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupBias {
    pub ratio: f64,
    pub violation: bool,
    /// Non-empty bins only, in bin order.
    pub approval_rates: Vec<GroupRate>,
    pub highest_group: Option<String>,
    pub lowest_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeProxy {
    pub proxy_detected: bool,
    pub income_gap_percent: f64,
    pub privileged_approved_avg_income: Option<f64>,
    pub unprivileged_approved_avg_income: Option<f64>,
    pub privileged_denied_avg_income: Option<f64>,
    pub unprivileged_denied_avg_income: Option<f64>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub score: f64,
    pub gender_di: DisparateImpact,
    pub age_bias: AgeGroupBias,
    pub income_proxy: IncomeProxy,
    pub violations: Vec<Violation>,
    pub explanation: String,
}

impl BiasResult {
    pub fn total_violations(&self) -> usize {
        self.violations.len()
    }
}

// ── Disparate Impact ─────────────────────────────────────────────────

/// How the reference group of a disparate-impact split is chosen.
///
/// The two rules are deliberately separate: gender uses a fixed convention
/// even when the data contradicts it, other attributes let the data decide.
#[derive(Debug, Clone, Copy)]
pub enum PrivilegeRule<'a> {
    Fixed {
        privileged: &'a str,
        unprivileged: &'a str,
    },
    HighestRate,
}

impl<'a> From<&'a PrivilegeConvention> for PrivilegeRule<'a> {
    fn from(c: &'a PrivilegeConvention) -> Self {
        PrivilegeRule::Fixed {
            privileged: &c.privileged,
            unprivileged: &c.unprivileged,
        }
    }
}

/// Approval-rate disparate impact across the values of a categorical column.
pub fn disparate_impact(
    dataset: &Dataset,
    attribute: Field,
    rule: PrivilegeRule<'_>,
    threshold: f64,
) -> Result<DisparateImpact, DomainError> {
    if attribute.kind() != FieldKind::Categorical {
        return Err(DomainError::UnsupportedAttribute(attribute.to_string()));
    }
    dataset.require(ANALYZER, &[attribute, Field::Prediction])?;

    let groups = group_means(
        dataset.records(),
        |r| r.category(attribute),
        |r| f64::from(r.prediction),
    );

    if groups.len() < 2 {
        return Ok(DisparateImpact::parity(attribute, threshold));
    }

    let (privileged, privileged_rate, unprivileged, unprivileged_rate) = match rule {
        PrivilegeRule::Fixed {
            privileged,
            unprivileged,
        } => {
            let rate = |g: &str| groups.get(g).map_or(0.0, |m| m.mean);
            (
                privileged.to_string(),
                rate(privileged),
                unprivileged.to_string(),
                rate(unprivileged),
            )
        }
        PrivilegeRule::HighestRate => {
            let Some(((max_k, max_rate), (min_k, min_rate))) =
                extremes(groups.iter().map(|(k, m)| (k, m.mean)))
            else {
                return Ok(DisparateImpact::parity(attribute, threshold));
            };
            (max_k.to_string(), max_rate, min_k.to_string(), min_rate)
        }
    };

    // No approvals in the reference group is defined as "no disparity".
    let ratio = if privileged_rate > 0.0 {
        unprivileged_rate / privileged_rate
    } else {
        1.0
    };

    Ok(DisparateImpact {
        attribute,
        ratio,
        violation: ratio < threshold,
        privileged_group: Some(privileged),
        privileged_rate,
        unprivileged_group: Some(unprivileged),
        unprivileged_rate,
        threshold,
    })
}

impl DisparateImpact {
    /// Fewer than two groups: nothing to compare against.
    fn parity(attribute: Field, threshold: f64) -> Self {
        Self {
            attribute,
            ratio: 1.0,
            violation: false,
            privileged_group: None,
            privileged_rate: 0.0,
            unprivileged_group: None,
            unprivileged_rate: 0.0,
            threshold,
        }
    }
}

/// Gender disparate impact under the configured privilege convention.
pub fn gender_disparate_impact(
    dataset: &Dataset,
    policy: &BiasPolicy,
) -> Result<DisparateImpact, DomainError> {
    disparate_impact(
        dataset,
        Field::Gender,
        PrivilegeRule::from(&policy.gender),
        policy.di_threshold,
    )
}

// ── Age Groups ───────────────────────────────────────────────────────

pub fn age_group_bias(dataset: &Dataset, policy: &BiasPolicy) -> Result<AgeGroupBias, DomainError> {
    dataset.require(ANALYZER, &[Field::Age, Field::Prediction])?;

    let mut bins = vec![RunningStats::new(); policy.age_bins.len()];
    for r in dataset.records() {
        if let Some(idx) = policy.age_bins.iter().position(|b| b.contains(r.age)) {
            bins[idx].push(f64::from(r.prediction));
        }
    }

    let approval_rates: Vec<GroupRate> = policy
        .age_bins
        .iter()
        .zip(&bins)
        .filter_map(|(bin, stats)| {
            stats.mean().map(|rate| GroupRate {
                group: bin.label.clone(),
                rate,
                count: stats.count(),
            })
        })
        .collect();

    let ranked = extremes(approval_rates.iter().map(|g| (&g.group, g.rate)));
    let (ratio, highest_group, lowest_group) = match ranked {
        Some(((hi, max_rate), (lo, min_rate))) => {
            let ratio = if max_rate > 0.0 { min_rate / max_rate } else { 1.0 };
            (ratio, Some(hi.clone()), Some(lo.clone()))
        }
        None => (1.0, None, None),
    };

    Ok(AgeGroupBias {
        ratio,
        violation: ratio < policy.di_threshold,
        approval_rates,
        highest_group,
        lowest_group,
    })
}

// ── Income Proxy ─────────────────────────────────────────────────────

pub fn income_proxy(dataset: &Dataset, policy: &BiasPolicy) -> Result<IncomeProxy, DomainError> {
    dataset.require(ANALYZER, &[Field::Gender, Field::Income, Field::Prediction])?;

    let privileged = policy.gender.privileged.as_str();
    let unprivileged = policy.gender.unprivileged.as_str();
    let avg_income = |group: &str, approved: bool| {
        filtered_mean(
            dataset.records(),
            |r| r.gender == group && r.approved() == approved,
            |r| r.income,
        )
    };

    let privileged_approved = avg_income(privileged, true);
    let unprivileged_approved = avg_income(unprivileged, true);
    let privileged_denied = avg_income(privileged, false);
    let unprivileged_denied = avg_income(unprivileged, false);

    let income_gap = match (privileged_approved, unprivileged_approved) {
        (Some(p), Some(u)) if p.max(u) > 0.0 => (p - u).abs() / p.max(u),
        _ => 0.0,
    };

    // The unprivileged group needing materially more income to still be
    // denied means income is standing in for the protected attribute.
    let proxy_detected = match (unprivileged_denied, privileged_denied) {
        (Some(u), Some(p)) => u > p * (1.0 + policy.proxy_income_margin),
        _ => false,
    };

    let explanation = if proxy_detected {
        format!(
            "Income may be used as a proxy that disadvantages {} applicants",
            unprivileged.to_lowercase()
        )
    } else {
        "No significant income proxy bias detected".to_string()
    };

    Ok(IncomeProxy {
        proxy_detected,
        income_gap_percent: income_gap * 100.0,
        privileged_approved_avg_income: privileged_approved,
        unprivileged_approved_avg_income: unprivileged_approved,
        privileged_denied_avg_income: privileged_denied,
        unprivileged_denied_avg_income: unprivileged_denied,
        explanation,
    })
}

// ── Scoring ──────────────────────────────────────────────────────────

/// Crossing the threshold jumps the risk to at least 50, then it climbs
/// steeply; above threshold only a small residual remains.
pub fn gender_risk(ratio: f64, threshold: f64) -> f64 {
    if ratio < threshold {
        VIOLATION_BASE_RISK + (threshold - ratio) * VIOLATION_SLOPE
    } else {
        ((1.0 - ratio) * RESIDUAL_SLOPE).max(0.0)
    }
}

pub fn age_risk(ratio: f64, threshold: f64) -> f64 {
    if ratio < threshold {
        ((threshold - ratio) / threshold * 100.0).max(0.0)
    } else {
        0.0
    }
}

pub fn composite_bias_score(
    gender_di: f64,
    age_ratio: f64,
    proxy_detected: bool,
    policy: &BiasPolicy,
) -> f64 {
    let proxy = if proxy_detected { PROXY_RISK } else { 0.0 };
    (policy.gender_weight * gender_risk(gender_di, policy.di_threshold)
        + policy.age_weight * age_risk(age_ratio, policy.di_threshold)
        + policy.proxy_weight * proxy)
        .clamp(0.0, 100.0)
}

fn explain(score: f64, gender_di: &DisparateImpact, policy: &BiasPolicy) -> String {
    let [minor, moderate, severe] = policy.bands;
    if score < minor {
        "No significant bias detected. Model shows fair treatment across demographic groups."
            .to_string()
    } else if score < moderate {
        "Minor bias indicators present. Monitor approval rates across demographics.".to_string()
    } else if score < severe {
        format!(
            "Moderate bias detected. {} approval rate is {:.0}% lower than {} approval rate.",
            policy.gender.unprivileged,
            (1.0 - gender_di.ratio) * 100.0,
            policy.gender.privileged.to_lowercase()
        )
    } else {
        format!(
            "Severe bias detected. Disparate Impact ratio of {:.2} violates the {:.0}% rule.",
            gender_di.ratio,
            policy.di_threshold * 100.0
        )
    }
}

fn collect_violations(
    gender_di: &DisparateImpact,
    age_bias: &AgeGroupBias,
    income_proxy: &IncomeProxy,
    policy: &BiasPolicy,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if gender_di.violation {
        violations.push(Violation {
            kind: ViolationKind::GenderDisparateImpact,
            severity: if gender_di.ratio < policy.critical_di {
                Severity::Critical
            } else {
                Severity::High
            },
            value: Some(gender_di.ratio),
            threshold: Some(policy.di_threshold),
            description: format!(
                "{} approval rate ({:.1}%) is significantly lower than {} rate ({:.1}%)",
                policy.gender.unprivileged,
                gender_di.unprivileged_rate * 100.0,
                policy.gender.privileged.to_lowercase(),
                gender_di.privileged_rate * 100.0
            ),
        });
    }

    if age_bias.violation {
        violations.push(Violation {
            kind: ViolationKind::AgeGroupDisparateImpact,
            severity: Severity::Moderate,
            value: Some(age_bias.ratio),
            threshold: Some(policy.di_threshold),
            description: format!(
                "Age group '{}' has significantly lower approval rate",
                age_bias.lowest_group.as_deref().unwrap_or("unknown")
            ),
        });
    }

    if income_proxy.proxy_detected {
        violations.push(Violation {
            kind: ViolationKind::IncomeProxyBias,
            severity: Severity::Moderate,
            value: None,
            threshold: None,
            description: income_proxy.explanation.clone(),
        });
    }

    violations
}

// ── Analyzer ─────────────────────────────────────────────────────────

pub struct BiasAnalyzer;

impl BiasAnalyzer {
    #[instrument(name = "bias_analysis", skip_all, fields(records = dataset.len()))]
    pub fn analyze(dataset: &Dataset, policy: &BiasPolicy) -> Result<BiasResult, DomainError> {
        let gender_di = gender_disparate_impact(dataset, policy)?;
        let age_bias = age_group_bias(dataset, policy)?;
        let income_proxy = income_proxy(dataset, policy)?;

        let score = composite_bias_score(
            gender_di.ratio,
            age_bias.ratio,
            income_proxy.proxy_detected,
            policy,
        );
        let violations = collect_violations(&gender_di, &age_bias, &income_proxy, policy);
        debug!(
            score,
            gender_di = gender_di.ratio,
            age_di = age_bias.ratio,
            violations = violations.len(),
            "Bias analysis complete"
        );

        Ok(BiasResult {
            score,
            explanation: explain(score, &gender_di, policy),
            gender_di,
            age_bias,
            income_proxy,
            violations,
        })
    }
}
