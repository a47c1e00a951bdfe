// sentinel-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(sentinel::infra::config))]
    ConfigError(String),

    #[error("Policy file not found at '{0}'")]
    #[diagnostic(code(sentinel::infra::config_missing))]
    ConfigNotFound(String),

    // --- DATASET FILES ---
    #[error("JSON Error: {0}")]
    #[diagnostic(
        code(sentinel::infra::json),
        help("Dataset files must hold an array of decision records.")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Dataset file '{path}' is invalid: {reason}")]
    #[diagnostic(code(sentinel::infra::dataset))]
    InvalidDataset { path: String, reason: String },
}
