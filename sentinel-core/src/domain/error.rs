// sentinel-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("{analyzer} analyzer requires column '{column}' which is missing from the dataset")]
    #[diagnostic(
        code(sentinel::domain::schema),
        help("The dataset feed must provide the fixed credit-decision schema.")
    )]
    MissingColumn { analyzer: String, column: String },

    #[error("Attribute '{0}' is not categorical and cannot be used for disparate impact")]
    #[diagnostic(code(sentinel::domain::attribute))]
    UnsupportedAttribute(String),

    #[error("{0} dataset is empty")]
    #[diagnostic(
        code(sentinel::domain::empty_dataset),
        help("Distribution tests need at least one record on each side.")
    )]
    EmptyDataset(String),

    #[error("Invalid risk policy: {0}")]
    #[diagnostic(
        code(sentinel::domain::policy),
        help("Check thresholds are in range and weights sum to 1.")
    )]
    InvalidPolicy(String),
}
