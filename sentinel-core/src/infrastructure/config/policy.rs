// sentinel-core/src/infrastructure/config/policy.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::policy::RiskPolicy;
use crate::error::SentinelError;
use crate::infrastructure::error::InfrastructureError;

/// Policy file names looked up in a project directory, in order.
pub const POLICY_FILES: [&str; 2] = ["sentinel.yaml", "sentinel_policy.yaml"];

pub const ENV_DI_THRESHOLD: &str = "SENTINEL_DI_THRESHOLD";
pub const ENV_BASELINE_ACCURACY: &str = "SENTINEL_BASELINE_ACCURACY";

/// Risk policy of a project: the first policy file found, or the defaults
/// when there is none, then environment overrides, then validation.
#[instrument(skip(project_dir))]
pub fn load_policy(project_dir: &Path) -> Result<RiskPolicy, SentinelError> {
    let policy = match find_policy_file(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading risk policy");
            parse_policy_file(&path)?
        }
        None => {
            info!(dir = ?project_dir, "No policy file found, using default policy");
            RiskPolicy::default()
        }
    };
    finalize(policy, |key| std::env::var(key).ok())
}

/// Loads an explicitly named policy file; unlike [`load_policy`] a missing
/// file is an error.
#[instrument]
pub fn load_policy_file(path: &Path) -> Result<RiskPolicy, SentinelError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()).into());
    }
    let policy = parse_policy_file(path)?;
    finalize(policy, |key| std::env::var(key).ok())
}

fn find_policy_file(root: &Path) -> Option<PathBuf> {
    POLICY_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn parse_policy_file(path: &Path) -> Result<RiskPolicy, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    // An empty file parses as YAML null
    if content.trim().is_empty() {
        return Ok(RiskPolicy::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

fn finalize(
    mut policy: RiskPolicy,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RiskPolicy, SentinelError> {
    apply_env_overrides(&mut policy, lookup)?;
    Ok(policy.validated()?)
}

/// Layered overrides, e.g. `SENTINEL_DI_THRESHOLD=0.75 sentinel audit`.
pub fn apply_env_overrides(
    policy: &mut RiskPolicy,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = lookup(ENV_DI_THRESHOLD) {
        let new = parse_number(ENV_DI_THRESHOLD, &val)?;
        info!(old = policy.bias.di_threshold, new, "Overriding DI threshold via ENV");
        policy.bias.di_threshold = new;
        // The critical level may never sit above the violation threshold
        if policy.bias.critical_di > new {
            warn!(
                old = policy.bias.critical_di,
                new, "Lowering critical DI to the overridden threshold"
            );
            policy.bias.critical_di = new;
        }
    }
    if let Some(val) = lookup(ENV_BASELINE_ACCURACY) {
        let new = parse_number(ENV_BASELINE_ACCURACY, &val)?;
        info!(
            old = policy.drift.baseline_accuracy,
            new, "Overriding baseline accuracy via ENV"
        );
        policy.drift.baseline_accuracy = new;
    }
    Ok(())
}

fn parse_number(key: &str, raw: &str) -> Result<f64, InfrastructureError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| InfrastructureError::ConfigError(format!("{key}='{raw}' is not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use anyhow::Result;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        assert!(find_policy_file(dir.path()).is_none());
        let policy = finalize(RiskPolicy::default(), env(&[]))?;
        assert_eq!(policy, RiskPolicy::default());
        Ok(())
    }

    #[test]
    fn test_first_candidate_wins() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("sentinel_policy.yaml"), "bias:\n  di_threshold: 0.7\n")?;
        fs::write(dir.path().join("sentinel.yaml"), "bias:\n  di_threshold: 0.75\n")?;

        let path = find_policy_file(dir.path()).unwrap_or_default();
        assert!(path.ends_with("sentinel.yaml"));
        assert_eq!(parse_policy_file(&path)?.bias.di_threshold, 0.75);
        Ok(())
    }

    #[test]
    fn test_empty_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sentinel.yaml");
        fs::write(&path, "\n")?;
        assert_eq!(parse_policy_file(&path)?, RiskPolicy::default());
        Ok(())
    }

    #[test]
    fn test_env_overrides_apply() -> Result<()> {
        let policy = finalize(
            RiskPolicy::default(),
            env(&[(ENV_DI_THRESHOLD, "0.75"), (ENV_BASELINE_ACCURACY, " 0.9 ")]),
        )?;
        assert_eq!(policy.bias.di_threshold, 0.75);
        assert_eq!(policy.drift.baseline_accuracy, 0.9);
        Ok(())
    }

    #[test]
    fn test_strict_threshold_override_lowers_critical_di() -> Result<()> {
        let policy = finalize(RiskPolicy::default(), env(&[(ENV_DI_THRESHOLD, "0.65")]))?;
        assert_eq!(policy.bias.di_threshold, 0.65);
        assert_eq!(policy.bias.critical_di, 0.65);

        // A threshold above the critical level leaves it alone
        let policy = finalize(RiskPolicy::default(), env(&[(ENV_DI_THRESHOLD, "0.75")]))?;
        assert_eq!(policy.bias.critical_di, 0.7);
        Ok(())
    }

    #[test]
    fn test_unparseable_override_is_config_error() {
        let mut policy = RiskPolicy::default();
        let res = apply_env_overrides(&mut policy, env(&[(ENV_DI_THRESHOLD, "high")]));
        assert!(matches!(res, Err(InfrastructureError::ConfigError(_))));
    }

    #[test]
    fn test_out_of_range_override_fails_validation() {
        let res = finalize(RiskPolicy::default(), env(&[(ENV_BASELINE_ACCURACY, "1.5")]));
        assert!(matches!(
            res,
            Err(SentinelError::Domain(DomainError::InvalidPolicy(_)))
        ));
    }

    #[test]
    fn test_malformed_yaml_is_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("sentinel.yaml"), "bias: [unclosed")?;
        let res = load_policy(dir.path());
        assert!(matches!(
            res,
            Err(SentinelError::Infrastructure(InfrastructureError::YamlError(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_not_found() {
        let res = load_policy_file(Path::new("/nonexistent/sentinel.yaml"));
        assert!(matches!(
            res,
            Err(SentinelError::Infrastructure(InfrastructureError::ConfigNotFound(_)))
        ));
    }
}
