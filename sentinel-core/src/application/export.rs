// sentinel-core/src/application/export.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::dataset::DatasetMode;
use crate::error::SentinelError;
use crate::infrastructure::adapters::json_file::{BASELINE_FILE, dataset_file_name};
use crate::infrastructure::fs::write_json;
use crate::ports::dataset::DatasetProvider;

/// Writes every feed plus the baseline as JSON files that
/// `JsonDatasetProvider` can read back. Returns the written paths.
#[instrument(skip(provider))]
pub fn export_datasets(
    provider: &dyn DatasetProvider,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, SentinelError> {
    let mut written = Vec::with_capacity(DatasetMode::ALL.len() + 1);

    for mode in DatasetMode::ALL {
        let ds = provider.dataset(mode)?;
        let path = out_dir.join(dataset_file_name(mode));
        write_json(&path, ds.records())?;
        info!(path = ?path, records = ds.len(), "Dataset exported");
        written.push(path);
    }

    let baseline = provider.baseline()?;
    let path = out_dir.join(BASELINE_FILE);
    write_json(&path, baseline.records())?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{JsonDatasetProvider, SyntheticDatasetProvider};
    use tempfile::tempdir;

    #[test]
    fn test_exported_files_load_back() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let synthetic = SyntheticDatasetProvider::new(50);

        let written = export_datasets(&synthetic, dir.path())?;
        assert_eq!(written.len(), 4);

        let json = JsonDatasetProvider::new(dir.path());
        assert_eq!(json.dataset(DatasetMode::Biased)?, synthetic.dataset(DatasetMode::Biased)?);
        assert_eq!(json.baseline()?, synthetic.baseline()?);
        Ok(())
    }
}
