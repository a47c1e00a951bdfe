// sentinel-core/src/domain/dataset/mod.rs

pub mod field;
pub mod record;

pub use field::{Field, FieldKind};
pub use record::{Record, employment_weight};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::error::DomainError;

/// Which customer feed an audit runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetMode {
    Clean,
    Biased,
    Drifted,
}

impl DatasetMode {
    pub const ALL: [DatasetMode; 3] = [Self::Clean, Self::Biased, Self::Drifted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Biased => "biased",
            Self::Drifted => "drifted",
        }
    }
}

impl fmt::Display for DatasetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatasetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "biased" => Ok(Self::Biased),
            "drifted" => Ok(Self::Drifted),
            _ => Err(format!("Unknown dataset mode: {}", s)),
        }
    }
}

/// An ordered table of decisions plus the set of columns the feed provided.
///
/// Records always carry every attribute; `columns` tells analyzers which of
/// them are real data. A column outside the set holds placeholder values and
/// must not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    columns: BTreeSet<Field>,
}

impl Dataset {
    /// Dataset with the complete schema.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            columns: Field::ALL.into_iter().collect(),
        }
    }

    pub fn with_columns(records: Vec<Record>, columns: BTreeSet<Field>) -> Self {
        Self { records, columns }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &BTreeSet<Field> {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Fails with the first column of `fields` the feed did not provide.
    pub fn require(&self, analyzer: &str, fields: &[Field]) -> Result<(), DomainError> {
        match fields.iter().find(|f| !self.has(**f)) {
            Some(missing) => Err(DomainError::MissingColumn {
                analyzer: analyzer.to_string(),
                column: missing.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Values of a numeric column in record order.
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.numeric(field))
            .collect()
    }

    /// Fraction of approved decisions, 0 for an empty dataset.
    pub fn approval_rate(&self) -> f64 {
        self.fraction(Record::approved)
    }

    /// Fraction of decisions matching the actual outcome, 0 for an empty dataset.
    pub fn accuracy(&self) -> f64 {
        self.fraction(Record::correct)
    }

    fn fraction(&self, predicate: impl Fn(&Record) -> bool) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| predicate(r)).count();
        hits as f64 / self.records.len() as f64
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            total_records: self.len(),
            approval_rate: self.approval_rate(),
            accuracy: self.accuracy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub approval_rate: f64,
    pub accuracy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(prediction: u8, actual: u8) -> Record {
        Record {
            customer_id: "CUST_000001".into(),
            age: 30,
            gender: "Male".into(),
            income: 50_000.0,
            credit_score: 700.0,
            employment_type: "Full-time".into(),
            debt_ratio: 0.2,
            prediction,
            actual_outcome: actual,
        }
    }

    #[test]
    fn test_rates() {
        let ds = Dataset::new(vec![record(1, 1), record(0, 1), record(1, 1), record(0, 0)]);
        assert_eq!(ds.approval_rate(), 0.5);
        assert_eq!(ds.accuracy(), 0.75);
        let stats = ds.stats();
        assert_eq!(stats.total_records, 4);
    }

    #[test]
    fn test_empty_dataset_rates_are_zero() {
        let ds = Dataset::new(vec![]);
        assert_eq!(ds.approval_rate(), 0.0);
        assert_eq!(ds.accuracy(), 0.0);
    }

    #[test]
    fn test_require_reports_first_missing_column() {
        let columns: BTreeSet<Field> = [Field::Gender, Field::Prediction].into_iter().collect();
        let ds = Dataset::with_columns(vec![record(1, 1)], columns);

        assert!(ds.require("bias", &[Field::Gender, Field::Prediction]).is_ok());
        match ds.require("bias", &[Field::Gender, Field::Income, Field::Age]) {
            Err(DomainError::MissingColumn { analyzer, column }) => {
                assert_eq!(analyzer, "bias");
                assert_eq!(column, "income");
            }
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_mode_parsing() {
        assert_eq!(DatasetMode::from_str("BIASED"), Ok(DatasetMode::Biased));
        assert_eq!(DatasetMode::Drifted.to_string(), "drifted");
        assert!(DatasetMode::from_str("noisy").is_err());
    }
}
