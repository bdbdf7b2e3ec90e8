//! Integration tests for the `rosterly` CLI binary.
//!
//! Argument parsing, help output, exit codes, and wiremock-backed happy
//! paths — all without a live roster server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rosterly` binary with env isolation.
///
/// Clears all `ROSTERLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn rosterly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rosterly");
    cmd.env("HOME", "/tmp/rosterly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rosterly-cli-test-nonexistent")
        .env_remove("ROSTERLY_PROFILE")
        .env_remove("ROSTERLY_SERVER")
        .env_remove("ROSTERLY_OUTPUT")
        .env_remove("ROSTERLY_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Start a mock roster server on a dedicated runtime.
///
/// The runtime must stay alive for the duration of the test so the
/// server keeps answering while the (blocking) CLI process runs.
fn mock_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn ann_json() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "firstName": "Ann",
        "lastName": "Ray",
        "email": "ann@example.com",
        "phone": "+12025550100",
        "course": "Math",
        "year": 2
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = rosterly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    rosterly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("student roster")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("add"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_version_flag() {
    rosterly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rosterly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    rosterly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    rosterly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    rosterly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_no_server_configured_exits_config_code() {
    let output = rosterly_cmd().arg("list").output().unwrap();
    assert_eq!(output.status.code(), Some(6), "Expected config exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("server"),
        "Expected server hint in output:\n{text}"
    );
}

// ── Local validation ────────────────────────────────────────────────

#[test]
fn test_add_with_invalid_fields_exits_validation_code() {
    // Validation runs before any connection attempt: a bogus server
    // URL must not matter.
    let output = rosterly_cmd()
        .args([
            "--server",
            "http://localhost:1",
            "add",
            "--first-name",
            "A",
            "--email",
            "not-an-email",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "Expected validation exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("First name must be at least 2 characters"),
        "Expected first-name error:\n{text}"
    );
    assert!(
        text.contains("Please enter a valid email address"),
        "Expected email error:\n{text}"
    );
    assert!(
        text.contains("Last name is required"),
        "All field errors reported together:\n{text}"
    );
}

// ── Server-backed paths ─────────────────────────────────────────────

#[test]
fn test_list_json_happy_path() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![ann_json()]))
            .mount(&server),
    );

    rosterly_cmd()
        .args(["--server", &server.uri(), "list", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"firstName\": \"Ann\"")
                .and(predicate::str::contains("ann@example.com")),
        );
}

#[test]
fn test_list_plain_emits_ids() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![ann_json()]))
            .mount(&server),
    );

    rosterly_cmd()
        .args(["--server", &server.uri(), "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_get_missing_record_exits_not_found_code() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/students/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );

    let output = rosterly_cmd()
        .args(["--server", &server.uri(), "get", "42"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "Expected not-found exit code");
    let text = combined_output(&output);
    assert!(text.contains("42"), "Expected id in message:\n{text}");
}

#[test]
fn test_add_duplicate_email_exits_conflict_code() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/students"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "Email already exists"})),
            )
            .mount(&server),
    );

    let output = rosterly_cmd()
        .args([
            "--server",
            &server.uri(),
            "add",
            "--first-name",
            "Ann",
            "--last-name",
            "Ray",
            "--email",
            "ann@example.com",
            "--phone",
            "+12025550100",
            "--course",
            "Math",
            "--year",
            "2",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4), "Expected conflict exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("already exists"),
        "Expected conflict message:\n{text}"
    );
}

#[test]
fn test_delete_with_yes_skips_prompt() {
    let (rt, server) = mock_server();
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/api/students/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ann_json()))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/students/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
    });

    rosterly_cmd()
        .args(["--server", &server.uri(), "delete", "1", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Student deleted successfully!"));
}

#[test]
fn test_delete_without_yes_refuses_when_non_interactive() {
    let (rt, server) = mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/students/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ann_json()))
            .mount(&server),
    );

    let output = rosterly_cmd()
        .args(["--server", &server.uri(), "delete", "1"])
        .output()
        .unwrap();

    assert!(
        !output.status.success(),
        "Expected refusal without --yes in non-interactive context"
    );
    let text = combined_output(&output);
    assert!(text.contains("--yes"), "Expected --yes hint:\n{text}");
}

#[test]
fn test_unreachable_server_exits_network_code() {
    let output = rosterly_cmd()
        .args(["--server", "http://127.0.0.1:1", "--timeout", "2", "list"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5), "Expected network exit code");
}

#[test]
fn test_by_year_out_of_range_is_local_validation() {
    let output = rosterly_cmd()
        .args(["--server", "http://localhost:1", "by-year", "9"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "Expected validation exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("between 1 and 6"),
        "Expected range message:\n{text}"
    );
}
