// sentinel-core/src/domain/dataset/record.rs

use serde::{Deserialize, Serialize};

use crate::domain::dataset::field::Field;

/// One credit decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub customer_id: String,
    pub age: u32,
    pub gender: String,
    pub income: f64,
    pub credit_score: f64,
    pub employment_type: String,
    pub debt_ratio: f64,
    /// 1 = approved, 0 = denied
    pub prediction: u8,
    pub actual_outcome: u8,
}

impl Record {
    pub fn approved(&self) -> bool {
        self.prediction == 1
    }

    pub fn correct(&self) -> bool {
        self.prediction == self.actual_outcome
    }

    /// Value of a numeric or binary column, `None` for text columns.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        match field {
            Field::Age => Some(f64::from(self.age)),
            Field::Income => Some(self.income),
            Field::CreditScore => Some(self.credit_score),
            Field::DebtRatio => Some(self.debt_ratio),
            Field::Prediction => Some(f64::from(self.prediction)),
            Field::ActualOutcome => Some(f64::from(self.actual_outcome)),
            Field::CustomerId | Field::Gender | Field::EmploymentType => None,
        }
    }

    /// Value of a categorical column, `None` for everything else.
    pub fn category(&self, field: Field) -> Option<&str> {
        match field {
            Field::Gender => Some(&self.gender),
            Field::EmploymentType => Some(&self.employment_type),
            _ => None,
        }
    }

    /// Approval likelihood from the weighted credit formula the decision
    /// model was built on. `None` when the employment type is unmapped.
    pub fn approval_likelihood(&self) -> Option<f64> {
        let employment = employment_weight(&self.employment_type)?;
        Some(
            0.3 * (self.credit_score - 300.0) / 550.0
                + 0.25 * (self.income - 20_000.0) / 180_000.0
                + 0.25 * (1.0 - self.debt_ratio)
                + 0.2 * employment,
        )
    }
}

pub fn employment_weight(employment_type: &str) -> Option<f64> {
    match employment_type {
        "Full-time" => Some(1.0),
        "Part-time" => Some(0.6),
        "Self-employed" => Some(0.7),
        "Unemployed" => Some(0.2),
        _ => None,
    }
}
