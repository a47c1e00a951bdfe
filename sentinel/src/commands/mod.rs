// sentinel/src/commands/mod.rs

pub mod analyze;
pub mod audit;
pub mod generate;

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

use sentinel_core::domain::policy::RiskPolicy;
use sentinel_core::infrastructure::adapters::{JsonDatasetProvider, SyntheticDatasetProvider};
use sentinel_core::infrastructure::config::{load_policy, load_policy_file};
use sentinel_core::ports::DatasetProvider;

/// An explicit `--policy` file wins over the project directory lookup.
pub(crate) fn resolve_policy(project_dir: &Path, policy: Option<&Path>) -> anyhow::Result<RiskPolicy> {
    match policy {
        Some(path) => load_policy_file(path)
            .with_context(|| format!("Failed to load risk policy from {:?}", path)),
        None => load_policy(project_dir)
            .with_context(|| format!("Failed to load risk policy from {:?}", project_dir)),
    }
}

/// Exported JSON feeds when a data directory is given, generated ones otherwise.
pub(crate) fn dataset_provider(data_dir: Option<PathBuf>, size: usize) -> Box<dyn DatasetProvider> {
    match data_dir {
        Some(dir) => {
            debug!(dir = ?dir, "Reading exported datasets");
            Box::new(JsonDatasetProvider::new(dir))
        }
        None => {
            debug!(size, "Generating synthetic datasets");
            Box::new(SyntheticDatasetProvider::new(size))
        }
    }
}
