// sentinel/src/commands/generate.rs
//
// USE CASE: Export the synthetic feeds so they can be inspected or audited
// later with `--data-dir`.

use anyhow::Context;
use std::path::PathBuf;

use sentinel_core::application::export_datasets;
use sentinel_core::infrastructure::adapters::SyntheticDatasetProvider;

pub fn execute(out_dir: PathBuf, size: usize) -> anyhow::Result<()> {
    println!(
        "🧪 Generating synthetic datasets ({} records each) in '{}'...",
        size,
        out_dir.display()
    );

    let provider = SyntheticDatasetProvider::new(size);
    let written = export_datasets(&provider, &out_dir)
        .with_context(|| format!("Failed to export datasets to {:?}", out_dir))?;

    for path in &written {
        println!("   ➜ {}", path.display());
    }
    println!("✨ {} datasets written.", written.len());
    Ok(())
}
