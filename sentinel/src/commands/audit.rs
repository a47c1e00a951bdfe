// sentinel/src/commands/audit.rs
//
// USE CASE: Full risk audit of one dataset feed.

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

use sentinel_core::application::run_audit;
use sentinel_core::domain::AuditResult;
use sentinel_core::domain::dataset::DatasetMode;
use sentinel_core::domain::risk::RiskStatus;
use sentinel_core::infrastructure::fs::write_json;

use super::{dataset_provider, resolve_policy};
use crate::cli::OutputFormat;

pub struct AuditOptions {
    pub mode: DatasetMode,
    pub project_dir: PathBuf,
    pub policy: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub size: usize,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

pub fn execute(opts: AuditOptions) -> anyhow::Result<()> {
    let table_mode = opts.format == OutputFormat::Table;
    if table_mode {
        println!("🛡️  Running AI risk audit on '{}' dataset...", opts.mode);
    }

    let policy = resolve_policy(&opts.project_dir, opts.policy.as_deref())?;
    let provider = dataset_provider(opts.data_dir, opts.size);

    let result = run_audit(provider.as_ref(), &policy, opts.mode)
        .with_context(|| format!("Audit of '{}' dataset failed", opts.mode))?;

    match opts.format {
        OutputFormat::Table => print_report(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if let Some(path) = &opts.output {
        write_json(path, &result)
            .with_context(|| format!("Failed to write audit result to {:?}", path))?;
        if table_mode {
            println!("📄 Audit result saved to {}", path.display());
        }
    }

    // Exit with error code for CI/CD
    if result.risk_status() == RiskStatus::Fail {
        if table_mode {
            eprintln!("\n❌ FAIL. AI Risk Score above the accepted ceiling.");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn status_badge(status: RiskStatus) -> &'static str {
    match status {
        RiskStatus::Pass => "✅ PASS",
        RiskStatus::Warning => "⚠️  WARNING",
        RiskStatus::Fail => "❌ FAIL",
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn print_report(result: &AuditResult) {
    println!("\n   Audit: {}", result.audit_id());
    println!(
        "   AI Risk Score: {:.1} ({})",
        result.ai_risk_score(),
        status_badge(result.risk_status())
    );

    let components = result.risk_components();
    let mut scores = new_table();
    scores.set_header(vec!["Component", "Score", "Contribution"]);
    scores.add_row(vec![
        "Bias risk".to_string(),
        format!("{:.1}", result.bias_risk_score()),
        format!("{:.1}", components.bias_contribution),
    ]);
    scores.add_row(vec![
        "Drift risk".to_string(),
        format!("{:.1}", result.drift_risk_score()),
        format!("{:.1}", components.drift_contribution),
    ]);
    scores.add_row(vec![
        "Explainability".to_string(),
        format!("{:.1}", result.explainability_score()),
        format!("{:.1}", components.explainability_contribution),
    ]);
    println!("{scores}");

    let stats = result.dataset_stats();
    println!("📊 Dataset Statistics:");
    println!("   Records:       {}", stats.total_records);
    println!("   Approval rate: {:.1}%", stats.approval_rate * 100.0);
    println!("   Accuracy:      {:.1}%", stats.accuracy * 100.0);

    if result.violations().is_empty() {
        println!("   ✅ No fairness violations detected.");
    } else {
        eprintln!("\n⚠️  {} violation(s) detected:", result.violations().len());
        for v in result.violations() {
            eprintln!("   ❌ [{}] {}: {}", v.severity, v.kind, v.description);
        }
    }

    if !result.recommendations().is_empty() {
        let mut recs = new_table();
        recs.set_header(vec!["ID", "Severity", "Title", "Action"]);
        for r in result.recommendations() {
            recs.add_row(vec![
                r.id.clone(),
                r.severity.to_string(),
                r.title.clone(),
                r.action.clone(),
            ]);
        }
        println!("\n💡 Recommendations:\n{recs}");
    }

    println!("\n{}", result.executive_summary());
}
