// sentinel/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sentinel_core::application::Component;
use sentinel_core::domain::dataset::DatasetMode;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "AI Risk Engine: bias, drift and explainability audits for credit models", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🛡️ Runs a full audit and computes the AI Risk Score
    Audit {
        /// Dataset feed to audit: clean | biased | drifted
        #[arg(long, short, default_value = "clean")]
        mode: DatasetMode,

        /// Project directory (holds sentinel.yaml)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Explicit policy file, overrides the project lookup
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Read exported JSON datasets from this directory instead of generating them
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Records per generated dataset
        #[arg(long, default_value_t = 1000)]
        size: usize,

        /// Also write the full audit result as JSON to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 🔬 Runs a single analyzer and prints its JSON result
    Analyze {
        /// Analyzer to run
        #[arg(value_enum)]
        component: ComponentArg,

        #[arg(long, short, default_value = "clean")]
        mode: DatasetMode,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        policy: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[arg(long, default_value_t = 1000)]
        size: usize,
    },

    /// 🧪 Generates the synthetic datasets as JSON files
    Generate {
        /// Output directory
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Records per dataset
        #[arg(long, default_value_t = 1000)]
        size: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComponentArg {
    Bias,
    Drift,
    Explainability,
}

impl From<ComponentArg> for Component {
    fn from(arg: ComponentArg) -> Self {
        match arg {
            ComponentArg::Bias => Component::Bias,
            ComponentArg::Drift => Component::Drift,
            ComponentArg::Explainability => Component::Explainability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_audit_defaults() -> Result<()> {
        let args = Cli::parse_from(["sentinel", "audit"]);
        match args.command {
            Commands::Audit {
                mode,
                project_dir,
                data_dir,
                size,
                output,
                format,
                ..
            } => {
                assert_eq!(mode, DatasetMode::Clean);
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(data_dir, None);
                assert_eq!(size, 1000);
                assert_eq!(output, None);
                assert_eq!(format, OutputFormat::Table);
                Ok(())
            }
            _ => bail!("Expected Audit command"),
        }
    }

    #[test]
    fn test_cli_parse_audit_options() -> Result<()> {
        let args = Cli::parse_from([
            "sentinel",
            "audit",
            "--mode",
            "Biased",
            "--data-dir",
            "/tmp/data",
            "--format",
            "json",
            "-o",
            "report.json",
        ]);
        match args.command {
            Commands::Audit {
                mode,
                data_dir,
                output,
                format,
                ..
            } => {
                assert_eq!(mode, DatasetMode::Biased);
                assert_eq!(data_dir, Some(PathBuf::from("/tmp/data")));
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert_eq!(format, OutputFormat::Json);
                Ok(())
            }
            _ => bail!("Expected Audit command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["sentinel", "audit", "--mode", "noisy"]).is_err());
    }

    #[test]
    fn test_cli_parse_analyze() -> Result<()> {
        let args = Cli::parse_from(["sentinel", "analyze", "drift", "--mode", "drifted"]);
        match args.command {
            Commands::Analyze {
                component, mode, ..
            } => {
                assert_eq!(Component::from(component), Component::Drift);
                assert_eq!(mode, DatasetMode::Drifted);
                Ok(())
            }
            _ => bail!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_generate() -> Result<()> {
        let args = Cli::parse_from(["sentinel", "generate", "--size", "50"]);
        match args.command {
            Commands::Generate { out_dir, size } => {
                assert_eq!(out_dir, PathBuf::from("data"));
                assert_eq!(size, 50);
                Ok(())
            }
            _ => bail!("Expected Generate command"),
        }
    }
}
