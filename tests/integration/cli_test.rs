//! Binary tests for the `invoke` subcommand.
//!
//! These only exercise paths that never reach AWS.

use std::io::Write;
use std::process::Command;

const DISPATCH_VARS: &[&str] = &[
    "DISPATCH_TRIGGER",
    "DISPATCH_CONFIG",
    "AWS_LAMBDA_FUNCTION_NAME",
    "DDB_TABLE",
    "CLUSTER_ID",
    "WORKGROUP_NAME",
    "DATABASE",
    "SECRET_ARN",
    "DB_USER",
];

/// Runs the binary with a clean dispatcher environment.
fn run(args: &[&str]) -> (i32, String, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_query-dispatch"));
    command.args(args);
    for var in DISPATCH_VARS {
        command.env_remove(var);
    }
    let output = command
        .env("AWS_REGION", "us-east-1")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

#[test]
fn test_missing_trigger_fails() {
    let (code, _stdout, stderr) = run(&["invoke"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no trigger selected"), "{stderr}");
}

#[test]
fn test_status_invoke_without_query_id() {
    let mut event = tempfile::NamedTempFile::new().unwrap();
    write!(event, r#"{{"query_name": "q1"}}"#).unwrap();

    let (code, stdout, _stderr) = run(&[
        "--trigger",
        "status",
        "invoke",
        "--event",
        event.path().to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    let response: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(response["statusCode"], 400);
}

#[test]
fn test_query_trigger_requires_configuration() {
    let mut event = tempfile::NamedTempFile::new().unwrap();
    write!(event, r#"{{"query_name": "q1"}}"#).unwrap();

    let config = tempfile::NamedTempFile::new().unwrap();

    let (code, stdout, stderr) = run(&[
        "--trigger",
        "direct",
        "--config",
        config.path().to_str().unwrap(),
        "invoke",
        "--event",
        event.path().to_str().unwrap(),
    ]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("DDB_TABLE"), "{stderr}");
}
