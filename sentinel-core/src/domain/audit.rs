// sentinel-core/src/domain/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::analysis::{
    BiasAnalyzer, BiasResult, DriftAnalyzer, DriftResult, ExplainabilityAnalyzer,
    ExplainabilityResult, Violation,
};
use crate::domain::dataset::{Dataset, DatasetMode, DatasetStats};
use crate::domain::error::DomainError;
use crate::domain::policy::RiskPolicy;
use crate::domain::risk::{
    Recommendation, RiskContributions, RiskStatus, composite_risk, executive_summary,
    generate_recommendations,
};

/// Outcome of one audit run. Built once by [`Auditor::audit`] and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    audit_id: String,
    timestamp: DateTime<Utc>,
    dataset_mode: DatasetMode,
    ai_risk_score: f64,
    risk_status: RiskStatus,
    risk_components: RiskContributions,
    bias_risk_score: f64,
    drift_risk_score: f64,
    explainability_score: f64,
    bias_details: BiasResult,
    drift_details: DriftResult,
    explainability_details: ExplainabilityResult,
    violations: Vec<Violation>,
    recommendations: Vec<Recommendation>,
    executive_summary: String,
    dataset_stats: DatasetStats,
}

impl AuditResult {
    pub fn audit_id(&self) -> &str {
        &self.audit_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn dataset_mode(&self) -> DatasetMode {
        self.dataset_mode
    }

    pub fn ai_risk_score(&self) -> f64 {
        self.ai_risk_score
    }

    pub fn risk_status(&self) -> RiskStatus {
        self.risk_status
    }

    pub fn risk_components(&self) -> &RiskContributions {
        &self.risk_components
    }

    pub fn bias_risk_score(&self) -> f64 {
        self.bias_risk_score
    }

    pub fn drift_risk_score(&self) -> f64 {
        self.drift_risk_score
    }

    pub fn explainability_score(&self) -> f64 {
        self.explainability_score
    }

    pub fn bias(&self) -> &BiasResult {
        &self.bias_details
    }

    pub fn drift(&self) -> &DriftResult {
        &self.drift_details
    }

    pub fn explainability(&self) -> &ExplainabilityResult {
        &self.explainability_details
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }

    pub fn dataset_stats(&self) -> &DatasetStats {
        &self.dataset_stats
    }
}

/// `AUDIT-<utc yyyymmddHHMMSS>-<8 uppercase hex>`
pub fn new_audit_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "AUDIT-{}-{}",
        at.format("%Y%m%d%H%M%S"),
        suffix[..8].to_uppercase()
    )
}

/// Runs the three analyzers and folds them into an [`AuditResult`].
pub struct Auditor {
    policy: RiskPolicy,
}

impl Auditor {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    #[instrument(name = "audit", skip_all, fields(mode = %mode, records = current.len()))]
    pub fn audit(
        &self,
        mode: DatasetMode,
        current: &Dataset,
        baseline: &Dataset,
    ) -> Result<AuditResult, DomainError> {
        let timestamp = Utc::now();

        let bias = BiasAnalyzer::analyze(current, &self.policy.bias)?;
        let drift = DriftAnalyzer::analyze(current, baseline, &self.policy.drift)?;
        let explainability = ExplainabilityAnalyzer::analyze(current, &self.policy.explainability)?;

        let risk = composite_risk(
            bias.score,
            drift.score,
            explainability.score,
            &self.policy.aggregate,
        );
        let recommendations =
            generate_recommendations(&bias, &drift, &explainability, risk.score, &self.policy);
        let summary = executive_summary(&risk, &bias, &drift);

        info!(
            score = risk.score,
            status = %risk.status,
            recommendations = recommendations.len(),
            "Audit complete"
        );

        Ok(AuditResult {
            audit_id: new_audit_id(timestamp),
            timestamp,
            dataset_mode: mode,
            ai_risk_score: risk.score,
            risk_status: risk.status,
            risk_components: risk.components,
            bias_risk_score: bias.score,
            drift_risk_score: drift.score,
            explainability_score: explainability.score,
            violations: bias.violations.clone(),
            bias_details: bias,
            drift_details: drift,
            explainability_details: explainability,
            recommendations,
            executive_summary: summary,
            dataset_stats: current.stats(),
        })
    }
}
