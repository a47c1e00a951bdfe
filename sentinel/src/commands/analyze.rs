// sentinel/src/commands/analyze.rs
//
// USE CASE: Run one analyzer on its own (partial refresh).

use anyhow::Context;
use std::path::PathBuf;

use sentinel_core::application::{Component, run_component};
use sentinel_core::domain::dataset::DatasetMode;

use super::{dataset_provider, resolve_policy};

pub fn execute(
    component: Component,
    mode: DatasetMode,
    project_dir: PathBuf,
    policy: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    size: usize,
) -> anyhow::Result<()> {
    let policy = resolve_policy(&project_dir, policy.as_deref())?;
    let provider = dataset_provider(data_dir, size);

    let report = run_component(provider.as_ref(), &policy, component, mode)
        .with_context(|| format!("{} analysis of '{}' dataset failed", component, mode))?;

    // Summary on stderr so stdout stays pure JSON
    eprintln!(
        "🔬 {} score: {:.1}. {}",
        component,
        report.score(),
        report.explanation()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
