// sentinel/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::audit::AuditOptions;
use sentinel_core::SentinelError;

fn main() {
    // RUST_LOG=debug sentinel audit ... to see analyzer details.
    // Logs go to stderr so JSON output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            mode,
            project_dir,
            policy,
            data_dir,
            size,
            output,
            format,
        } => commands::audit::execute(AuditOptions {
            mode,
            project_dir,
            policy,
            data_dir,
            size,
            output,
            format,
        }),

        Commands::Analyze {
            component,
            mode,
            project_dir,
            policy,
            data_dir,
            size,
        } => commands::analyze::execute(component.into(), mode, project_dir, policy, data_dir, size),

        Commands::Generate { out_dir, size } => commands::generate::execute(out_dir, size),
    };

    if let Err(err) = result {
        report(err);
        std::process::exit(1);
    }
}

/// Engine errors carry miette diagnostics (codes, help); render those as
/// reports under the context line, everything else as a plain chain.
fn report(err: anyhow::Error) {
    let headline = err.to_string();
    match err.downcast::<SentinelError>() {
        Ok(engine_err) => {
            eprintln!("\n💥 {}", headline);
            eprintln!("{:?}", miette::Report::new(engine_err));
        }
        Err(other) => eprintln!("\n💥 {:#}", other),
    }
}
