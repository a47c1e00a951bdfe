use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Throwaway project directory the binary runs in.
struct SentinelTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl SentinelTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self { _tmp: tmp, root })
    }

    fn sentinel(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sentinel"));
        cmd.current_dir(&self.root);
        cmd.env_remove("SENTINEL_DI_THRESHOLD");
        cmd.env_remove("SENTINEL_BASELINE_ACCURACY");
        cmd
    }
}

#[test]
fn test_generate_writes_all_feeds() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["generate", "--out-dir", "data", "--size", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 datasets written"));

    for name in [
        "dataset_clean.json",
        "dataset_biased.json",
        "dataset_drifted.json",
        "dataset_baseline.json",
    ] {
        assert!(env.root.join("data").join(name).exists(), "{name} missing");
    }
    Ok(())
}

#[test]
fn test_clean_audit_passes_with_json_output() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["audit", "--mode", "clean", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"risk_status\": \"PASS\""))
        .stdout(predicate::str::contains("\"audit_id\": \"AUDIT-"));
    Ok(())
}

#[test]
fn test_audit_from_exported_files_saves_result() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel().args(["generate", "--out-dir", "data"]).assert().success();

    env.sentinel()
        .args(["audit", "--data-dir", "data", "--output", "reports/audit.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AI Risk Score"))
        .stdout(predicate::str::contains("Dataset Statistics"));

    let saved = std::fs::read_to_string(env.root.join("reports/audit.json"))?;
    let json: serde_json::Value = serde_json::from_str(&saved)?;
    assert_eq!(json["dataset_mode"], "clean");
    assert_eq!(json["dataset_stats"]["total_records"], 1000);
    Ok(())
}

#[test]
fn test_analyze_prints_single_component() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["analyze", "bias", "--mode", "biased", "--size", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"component\": \"bias\""))
        .stdout(predicate::str::contains("gender_di"))
        .stderr(predicate::str::contains("bias score:"));
    Ok(())
}

#[test]
fn test_policy_file_is_honoured() -> Result<()> {
    let env = SentinelTestEnv::new()?;
    std::fs::write(env.root.join("sentinel.yaml"), "bias:\n  di_threshold: 0.75\n  critical_di: 0.6\n")?;

    env.sentinel()
        .args(["analyze", "bias", "--size", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"threshold\": 0.75"));
    Ok(())
}

#[test]
fn test_env_threshold_below_critical_level_is_accepted() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .env("SENTINEL_DI_THRESHOLD", "0.65")
        .args(["analyze", "bias", "--size", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"threshold\": 0.65"));
    Ok(())
}

#[test]
fn test_missing_policy_file_fails_cleanly() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["audit", "--policy", "nowhere.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load risk policy"));
    Ok(())
}

#[test]
fn test_missing_data_dir_fails_cleanly() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["audit", "--data-dir", "empty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Audit of 'clean' dataset failed"));
    Ok(())
}

#[test]
fn test_unknown_mode_is_rejected() -> Result<()> {
    let env = SentinelTestEnv::new()?;

    env.sentinel()
        .args(["audit", "--mode", "noisy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown dataset mode"));
    Ok(())
}
