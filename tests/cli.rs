//! Tests for the binary: subcommands, output formats and exit codes.

use std::process::{Command, Output};

use tempfile::TempDir;

fn jobopt(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jobopt"))
        .args(args)
        .env_clear()
        .env("JOBOPT_CONF", home.path().join("config.toml"))
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Successful resolution
// ============================================================================

#[test]
fn test_json_output_for_step() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["--json", "step", "-n", "2", "-p", "debug", "hostname"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["context"], "step");
    let component = &json["components"][0];
    assert_eq!(component["options"]["ntasks"], 2);
    assert_eq!(component["options"]["partition"], "debug");
    assert_eq!(component["command"][0], "hostname");
}

#[test]
fn test_human_summary_lists_components() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["batch", "-p", "a", ":", "-p", "b", "job.sh"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("component 0 (batch)"));
    assert!(stdout.contains("component 1 (batch)"));
    assert!(stdout.contains("partition : b"));
}

#[test]
fn test_verbose_prints_report() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["step", "-v", "--account=phys", "true"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("defined options"));
    assert!(stderr.contains("account"));
    assert!(stderr.contains("end of defined options"));
}

#[test]
fn test_site_config_default_command() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.toml"), "default_command = \"echo hi\"\n").unwrap();

    let output = jobopt(&home, &["--json", "alloc", "-N", "1"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["components"][0]["command"][2], "echo hi");
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn test_usage_lists_context_flags() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["alloc", "--usage"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: jobopt alloc"));
    assert!(stdout.contains("--bell"));
    assert!(!stdout.contains("--kill-on-bad-exit"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_value_exits_with_error() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["batch", "--nice=abc"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_unknown_flag_exits_with_error() {
    let home = TempDir::new().unwrap();
    let output = jobopt(&home, &["step", "--frobnicate", "true"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--frobnicate"));
}

#[test]
fn test_bad_site_config_exits_with_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.toml"), "default_shell = \"sh\"\n").unwrap();

    let output = jobopt(&home, &["batch"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load site configuration"));
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_unwritable_log_file_falls_back_to_stderr() {
    let home = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_jobopt"))
        .args(["step", "hostname"])
        .env_clear()
        .env("JOBOPT_CONF", home.path().join("config.toml"))
        .env("JOBOPT_LOG", home.path().join("missing").join("jobopt.log"))
        .env("SLURM_TIMELIMIT", "later")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create log file"), "{stderr}");
    assert!(stderr.contains("invalid environment value"), "{stderr}");
}
