// sentinel-core/src/infrastructure/adapters/json_file.rs
//
// Dataset feed backed by JSON exports: `dataset_<mode>.json` plus
// `dataset_baseline.json`, each an array of decision objects.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::dataset::{Dataset, DatasetMode, Field, Record};
use crate::error::SentinelError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset::DatasetProvider;

pub const BASELINE_FILE: &str = "dataset_baseline.json";

pub fn dataset_file_name(mode: DatasetMode) -> String {
    format!("dataset_{}.json", mode)
}

/// One row as found in the file: any column may be absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    customer_id: Option<String>,
    age: Option<u32>,
    gender: Option<String>,
    income: Option<f64>,
    credit_score: Option<f64>,
    employment_type: Option<String>,
    debt_ratio: Option<f64>,
    prediction: Option<u8>,
    actual_outcome: Option<u8>,
}

impl RawRecord {
    fn has(&self, field: Field) -> bool {
        match field {
            Field::CustomerId => self.customer_id.is_some(),
            Field::Age => self.age.is_some(),
            Field::Gender => self.gender.is_some(),
            Field::Income => self.income.is_some(),
            Field::CreditScore => self.credit_score.is_some(),
            Field::EmploymentType => self.employment_type.is_some(),
            Field::DebtRatio => self.debt_ratio.is_some(),
            Field::Prediction => self.prediction.is_some(),
            Field::ActualOutcome => self.actual_outcome.is_some(),
        }
    }

    /// Missing columns become placeholders; the dataset's column set keeps
    /// analyzers away from them.
    fn into_record(self) -> Record {
        Record {
            customer_id: self.customer_id.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            income: self.income.unwrap_or_default(),
            credit_score: self.credit_score.unwrap_or_default(),
            employment_type: self.employment_type.unwrap_or_default(),
            debt_ratio: self.debt_ratio.unwrap_or_default(),
            prediction: self.prediction.unwrap_or_default(),
            actual_outcome: self.actual_outcome.unwrap_or_default(),
        }
    }
}

/// Reads one dataset file. A column counts as provided only if every row
/// carries it.
#[instrument]
pub fn read_dataset(path: &Path) -> Result<Dataset, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::InvalidDataset {
            path: path.display().to_string(),
            reason: "file not found".into(),
        });
    }
    let content = fs::read_to_string(path)?;
    let rows: Vec<RawRecord> = serde_json::from_str(&content)?;

    for (i, row) in rows.iter().enumerate() {
        let binary_ok = |v: Option<u8>| v.is_none_or(|b| b <= 1);
        if !binary_ok(row.prediction) || !binary_ok(row.actual_outcome) {
            return Err(InfrastructureError::InvalidDataset {
                path: path.display().to_string(),
                reason: format!("row {}: prediction and actual_outcome must be 0 or 1", i),
            });
        }
    }

    let columns: BTreeSet<Field> = Field::ALL
        .into_iter()
        .filter(|f| rows.iter().all(|r| r.has(*f)))
        .collect();
    if columns.len() < Field::ALL.len() {
        let missing: Vec<&str> = Field::ALL
            .iter()
            .filter(|f| !columns.contains(f))
            .map(|f| f.as_str())
            .collect();
        warn!(path = ?path, ?missing, "Dataset does not provide every column");
    }

    let records = rows.into_iter().map(RawRecord::into_record).collect();
    Ok(Dataset::with_columns(records, columns))
}

#[derive(Debug, Clone)]
pub struct JsonDatasetProvider {
    dir: PathBuf,
}

impl JsonDatasetProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatasetProvider for JsonDatasetProvider {
    fn dataset(&self, mode: DatasetMode) -> Result<Dataset, SentinelError> {
        let path = self.dir.join(dataset_file_name(mode));
        let ds = read_dataset(&path)?;
        info!(path = ?path, records = ds.len(), "Loaded dataset");
        Ok(ds)
    }

    fn baseline(&self) -> Result<Dataset, SentinelError> {
        Ok(read_dataset(&self.dir.join(BASELINE_FILE))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const FULL_ROW: &str = r#"{"customer_id":"CUST_000001","age":30,"gender":"Female","income":52000,"credit_score":700,"employment_type":"Full-time","debt_ratio":0.25,"prediction":1,"actual_outcome":1}"#;

    #[test]
    fn test_full_schema_roundtrip_from_disk() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("dataset_clean.json"), format!("[{FULL_ROW}]"))?;

        let ds = JsonDatasetProvider::new(dir.path()).dataset(DatasetMode::Clean)?;
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.columns().len(), Field::ALL.len());
        assert_eq!(ds.records()[0].income, 52_000.0);
        Ok(())
    }

    #[test]
    fn test_column_missing_in_one_row_is_absent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dataset_biased.json");
        fs::write(
            &path,
            format!(r#"[{FULL_ROW}, {{"customer_id":"CUST_000002","age":41,"prediction":0,"actual_outcome":1}}]"#),
        )?;

        let ds = read_dataset(&path)?;
        assert!(ds.has(Field::Age));
        assert!(!ds.has(Field::Gender));
        assert!(!ds.has(Field::Income));
        Ok(())
    }

    #[test]
    fn test_non_binary_prediction_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dataset_clean.json");
        fs::write(&path, r#"[{"prediction":2,"actual_outcome":0}]"#)?;

        assert!(matches!(
            read_dataset(&path),
            Err(InfrastructureError::InvalidDataset { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file_and_bad_json() -> Result<()> {
        let dir = tempdir()?;
        let provider = JsonDatasetProvider::new(dir.path());
        assert!(provider.baseline().is_err());

        fs::write(dir.path().join(BASELINE_FILE), "{not json")?;
        assert!(matches!(
            read_dataset(&dir.path().join(BASELINE_FILE)),
            Err(InfrastructureError::JsonError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_file_names() {
        assert_eq!(dataset_file_name(DatasetMode::Drifted), "dataset_drifted.json");
    }
}
