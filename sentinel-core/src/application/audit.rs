// sentinel-core/src/application/audit.rs

use std::time::Instant;
use tracing::{error, info, instrument};

use crate::domain::audit::{AuditResult, Auditor};
use crate::domain::dataset::DatasetMode;
use crate::domain::policy::RiskPolicy;
use crate::error::SentinelError;
use crate::ports::dataset::DatasetProvider;

/// Full audit of one feed: load current and baseline data, run every
/// analyzer, aggregate, recommend.
#[instrument(skip(provider, policy), fields(mode = %mode))]
pub fn run_audit(
    provider: &dyn DatasetProvider,
    policy: &RiskPolicy,
    mode: DatasetMode,
) -> Result<AuditResult, SentinelError> {
    let start = Instant::now();

    let current = provider.dataset(mode)?;
    let baseline = provider.baseline()?;

    match Auditor::new(policy.clone()).audit(mode, &current, &baseline) {
        Ok(result) => {
            info!(
                audit_id = result.audit_id(),
                score = result.ai_risk_score(),
                status = %result.risk_status(),
                "Audit finished in {:.2?}",
                start.elapsed()
            );
            Ok(result)
        }
        Err(e) => {
            error!("Audit failed after {:.2?}: {}", start.elapsed(), e);
            Err(e.into())
        }
    }
}
