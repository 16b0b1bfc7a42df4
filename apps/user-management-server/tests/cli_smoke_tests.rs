//! CLI smoke tests for the user-management-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output, and basic command functionality.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

/// Helper to run the server binary with given arguments
fn run_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_user-management-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute user-management-server")
}

/// Helper to run the server binary with timeout
async fn run_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_user-management-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Write a config whose home_dir is the temp dir, so logs and the database
/// stay inside it.
fn write_config(dir: &TempDir, name: &str, body: &str) -> String {
    let home = dir.path().to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0
{body}
"#
    );
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

const QUIET_LOGGING: &str = r#"
logging:
  default:
    console_level: error
    file: "logs/user-management.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10
"#;

#[test]
fn test_cli_help_command() {
    let output = run_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user-management-server"));
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user-management-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized"),
        "Should contain error message about invalid command: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    for flag in ["--config", "-c"] {
        let output = run_server(&[flag, "/nonexistent/config.yaml", "check"]);

        assert!(!output.status.success(), "Should fail with missing config");

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("Config file not found"),
            "Should mention config file issue: {}",
            stderr
        );
    }
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load config"),
        "Should mention config loading issue: {}",
        stderr
    );
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
database:
  url: "sqlite://database/users.db?mode=rwc"
{QUIET_LOGGING}
modules:
  user_management:
    max_name_length: 80
  api_ingress:
    cors_enabled: true
"#
    );
    let config_path = write_config(&temp_dir, "valid.yaml", &body);

    let output = run_server(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "Should succeed with valid config.\nSTDOUT: {stdout}\nSTDERR: {stderr}"
    );
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("127.0.0.1:0"));
}

#[test]
fn test_cli_check_rejects_bad_module_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
{QUIET_LOGGING}
modules:
  user_management:
    max_name_len: 80
"#
    );
    let config_path = write_config(&temp_dir, "bad_module.yaml", &body);

    let output = run_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid user_management config"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_cli_check_rejects_invalid_bind_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
{QUIET_LOGGING}
modules:
  api_ingress:
    bind_addr: "not-an-address"
"#
    );
    let config_path = write_config(&temp_dir, "bad_addr.yaml", &body);

    let output = run_server(&["--config", &config_path, "run"]);

    assert!(!output.status.success(), "Should fail with invalid bind address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid bind address"), "stderr: {stderr}");
}

#[test]
fn test_cli_mock_flag_overrides_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
database:
  url: "postgresql://localhost/nonexistent"
{QUIET_LOGGING}
"#
    );
    let config_path = write_config(&temp_dir, "mock.yaml", &body);

    // Without --mock the postgres URL is rejected
    let output = run_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "stderr: {stderr}");

    // With --mock the in-memory database replaces it
    let output = run_server(&["--config", &config_path, "--mock", "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with mock database: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("sqlite::memory:"));
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "print.yaml", QUIET_LOGGING);

    let output = run_server(&["--config", &config_path, "--port", "9123", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9123"), "stdout: {stdout}");
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "run.yaml", QUIET_LOGGING);

    // Server should start and keep running until the timeout kills it
    let result = run_server_with_timeout(
        &["--config", &config_path, "--mock", "run"],
        Duration::from_secs(5),
    )
    .await;

    match result {
        Err(err) => {
            assert!(
                err.to_string().contains("elapsed"),
                "Server failed to start: {err}"
            );
        }
        Ok(output) => {
            panic!(
                "Server exited early.\nSTDOUT: {}\nSTDERR: {}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    // Log file landed under home_dir
    assert!(Path::new(&temp_dir.path().join("logs")).is_dir());
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start the server"));

    let output = run_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Check configuration"));
}
