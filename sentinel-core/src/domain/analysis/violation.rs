// sentinel-core/src/domain/analysis/violation.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    #[serde(rename = "Gender Disparate Impact")]
    GenderDisparateImpact,
    #[serde(rename = "Age Group Disparate Impact")]
    AgeGroupDisparateImpact,
    #[serde(rename = "Income Proxy Bias")]
    IncomeProxyBias,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenderDisparateImpact => "Gender Disparate Impact",
            Self::AgeGroupDisparateImpact => "Age Group Disparate Impact",
            Self::IncomeProxyBias => "Income Proxy Bias",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fairness rule that fired during the audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub description: String,
}
