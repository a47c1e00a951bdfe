// sentinel-core/src/domain/dataset/field.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a column is consumed by the analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Identifier,
    Numeric,
    Categorical,
    Binary,
}

/// Columns of the credit-decision schema.
///
/// The declaration order is the column order of the feed, so `Ord` gives a
/// stable iteration order for schema sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CustomerId,
    Age,
    Gender,
    Income,
    CreditScore,
    EmploymentType,
    DebtRatio,
    Prediction,
    ActualOutcome,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::CustomerId,
        Field::Age,
        Field::Gender,
        Field::Income,
        Field::CreditScore,
        Field::EmploymentType,
        Field::DebtRatio,
        Field::Prediction,
        Field::ActualOutcome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerId => "customer_id",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Income => "income",
            Self::CreditScore => "credit_score",
            Self::EmploymentType => "employment_type",
            Self::DebtRatio => "debt_ratio",
            Self::Prediction => "prediction",
            Self::ActualOutcome => "actual_outcome",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::CustomerId => FieldKind::Identifier,
            Self::Age | Self::Income | Self::CreditScore | Self::DebtRatio => FieldKind::Numeric,
            Self::Gender | Self::EmploymentType => FieldKind::Categorical,
            Self::Prediction | Self::ActualOutcome => FieldKind::Binary,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown column: {}", s))
    }
}
