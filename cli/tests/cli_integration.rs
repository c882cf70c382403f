use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const USER_TOOL: &str = r#"
name: usertool
global_options:
  - "--env:<string-env>?Target environment"
commands:
  - primary: "users?Performs operations on a user"
    options:
      - "[--create <string-createUser>]?Creates a user"
      - "[--list]?List users"
  - primary: "groups?Performs operations on user groups"
    options:
      - "[--describe <string-describeGroup>]?Describe details of a user group"
"#;

fn write_definitions(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write definitions");
    path
}

fn cmdtpl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdtpl"))
        .args(args)
        .output()
        .expect("failed to run cmdtpl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_check_accepts_valid_definitions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yaml", USER_TOOL);

    let output = cmdtpl(&["check", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("ok: 2 command(s) and 1 global option(s)"));
}

#[test]
fn test_check_reports_every_definition_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(
        dir.path(),
        "broken.yaml",
        r#"
name: broken
commands:
  - primary: "users"
  - primary: "users"
  - primary: "test:"
"#,
    );

    let output = cmdtpl(&["check", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("2 definition errors"), "stderr: {err}");
    assert!(err.contains("expected unique argument \"users\""));
    assert!(err.contains("expected value spec in \"test:\""));
}

#[test]
fn test_check_rejects_unknown_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.toml", USER_TOOL);

    let output = cmdtpl(&["check", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unsupported definition file format"));
}

#[test]
fn test_summary_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yml", USER_TOOL);

    let output = cmdtpl(&["summary", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        summary["named"][0]["options"]["[--list]"],
        serde_json::json!("List users")
    );
    assert_eq!(
        summary["named"][1]["primary"]["groups"],
        serde_json::json!("Performs operations on user groups")
    );

    let output = cmdtpl(&["summary", path.to_str().unwrap(), "--format", "yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("named:"), "stdout: {text}");
    assert!(text.contains("Performs operations on a user"));
}

#[test]
fn test_help_filtered_listing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yaml", USER_TOOL);

    let output = cmdtpl(&["help", path.to_str().unwrap(), "list"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    // Descriptions start two columns after the widest argument.
    let expected = format!(
        "Matching Commands:\n\n  users{}Performs operations on a user\n    [--create <createUser>]  Creates a user\n    [--list]{}List users\n\n",
        " ".repeat(22),
        " ".repeat(17)
    );
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_help_for_single_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yaml", USER_TOOL);

    let output = cmdtpl(&["help", path.to_str().unwrap(), "--command", "groups"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("groups  "));

    let output = cmdtpl(&["help", path.to_str().unwrap(), "--command", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("command \"nope\" not found"));
}

#[test]
fn test_run_prints_bound_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yaml", USER_TOOL);

    let output = cmdtpl(&[
        "run",
        path.to_str().unwrap(),
        "--",
        "--env:prod",
        "users",
        "--create",
        "ada",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let records: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["values"]["env"], serde_json::json!("prod"));
    assert_eq!(
        records[1]["values"],
        serde_json::json!({
            "--create": true,
            "--list": false,
            "createUser": "ada",
            "users": true,
        })
    );
}

#[test]
fn test_run_usage_error_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definitions(dir.path(), "usertool.yaml", USER_TOOL);

    let output = cmdtpl(&["run", path.to_str().unwrap(), "--", "bogus"]);
    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(
        text.starts_with("Usage: usertool <global options> <command> <options>\n"),
        "stdout: {text}"
    );
    assert!(text.contains("All Commands:"));

    let output = cmdtpl(&["run", path.to_str().unwrap(), "--", "users", "--describe"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).starts_with("\nSyntax error.\n\nCommand Help:\n\n"));
}
