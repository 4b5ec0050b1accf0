//! Integration tests for the `trunkdesk` CLI binary.
//!
//! Each test gets its own temp directory for the config file and the
//! file-backed session store; server-facing commands run against wiremock.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn session_path(&self) -> PathBuf {
        self.dir
            .path()
            .join("data")
            .join("trunkdesk")
            .join("sessions")
            .join("default.json")
    }

    /// Build a [`Command`] for the `trunkdesk` binary with env isolation.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("trunkdesk");
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("TRUNKDESK_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("TRUNKDESK_PROFILE")
            .env_remove("TRUNKDESK_SERVER")
            .env_remove("TRUNKDESK_OUTPUT")
            .env_remove("TRUNKDESK_TIMEOUT")
            .env_remove("TRUNKDESK_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    fn write_config(&self, server: &str) {
        std::fs::write(
            self.config_path(),
            format!(
                "default_profile = \"default\"\n\n\
                 [profiles.default]\n\
                 server = \"{server}\"\n\
                 username = \"admin\"\n\
                 session_store = \"file\"\n"
            ),
        )
        .unwrap();
    }

    fn seed_session(&self, role: &str) {
        let path = self.session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            path,
            json!({ "token": "tok-123", "user": { "username": "ops", "role": role } }).to_string(),
        )
        .unwrap();
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn logged_in(role: &str) -> (MockServer, Sandbox) {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri());
    sandbox.seed_session(role);
    (server, sandbox)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = sandbox.cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_entity_commands() {
    Sandbox::new().cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("nso")
            .and(predicate::str::contains("vno"))
            .and(predicate::str::contains("customers"))
            .and(predicate::str::contains("mappings"))
            .and(predicate::str::contains("dids"))
            .and(predicate::str::contains("dashboard")),
    );
}

#[test]
fn test_completions_zsh() {
    Sandbox::new()
        .cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let output = Sandbox::new()
        .cmd()
        .args(["--output", "xml", "nso", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_list_without_config_explains_setup() {
    Sandbox::new()
        .cmd()
        .args(["nso", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unknown_profile_lists_available() {
    let sandbox = Sandbox::new();
    sandbox.write_config("http://127.0.0.1:9");
    sandbox
        .cmd()
        .args(["--profile", "prod", "dids", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prod").and(predicate::str::contains("default")));
}

#[test]
fn test_set_profile_then_use_it() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "set-profile", "lab", "http://10.0.0.5:5000"])
        .args(["--session-store", "file"])
        .assert()
        .success();
    sandbox.cmd().args(["config", "use", "lab"]).assert().success();
    sandbox
        .cmd()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab *"));

    let written = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert!(written.contains("http://10.0.0.5:5000"));
}

#[test]
fn test_set_profile_rejects_bad_store() {
    Sandbox::new()
        .cmd()
        .args(["config", "set-profile", "lab", "http://10.0.0.5:5000"])
        .args(["--session-store", "cloud"])
        .assert()
        .code(2);
}

// ── Session ─────────────────────────────────────────────────────────

#[test]
fn test_list_without_session_asks_for_login() {
    let sandbox = Sandbox::new();
    sandbox.write_config("http://127.0.0.1:9");
    sandbox
        .cmd()
        .args(["customers", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("trunkdesk login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "admin123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "username": "admin",
            "role": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri());

    sandbox
        .cmd()
        .arg("login")
        .env("TRUNKDESK_PASSWORD", "admin123")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as admin (admin)"));

    let stored = std::fs::read_to_string(sandbox.session_path()).unwrap();
    assert!(stored.contains("jwt-abc"));

    sandbox
        .cmd()
        .args(["whoami", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"role\": \"admin\""));

    sandbox.cmd().arg("logout").assert().success();
    assert!(!sandbox.session_path().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.write_config(&server.uri());

    sandbox
        .cmd()
        .args(["login", "--password-stdin"])
        .write_stdin("wrong\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid credentials"));
    assert!(!sandbox.session_path().exists());
}

// ── Records ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_sends_bearer_and_prints_wire_json() {
    let (server, sandbox) = logged_in("user").await;
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Acme", "email": "ops@acme.test", "phone": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = sandbox
        .cmd()
        .args(["customers", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        json!([{ "id": 1, "name": "Acme", "email": "ops@acme.test", "phone": null }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_posts_template_with_overrides() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(method("POST"))
        .and(path("/api/nso-trunks"))
        .and(body_json(json!({
            "serviceId": "SVC-1",
            "pilotNumber": "2125550100",
            "channels": 23,
            "areaCode": "212",
            "status": "Active"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "message": "Created successfully", "id": 17 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["nso", "create", "-o", "plain"])
        .args(["--set", "serviceId=SVC-1", "--set", "pilotNumber=2125550100"])
        .args(["--set", "channels=23", "--set", "areaCode=212"])
        .assert()
        .success()
        .stdout("17\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_large_id_is_a_put() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(method("GET"))
        .and(path("/api/dids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 2_000_000,
            "didNumber": "2125550199",
            "trunkId": 3,
            "trunkType": "VNO",
            "status": "Available"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/dids/2000000"))
        .and(body_json(json!({
            "didNumber": "2125550199",
            "trunkId": 3,
            "trunkType": "VNO",
            "status": "Assigned"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Updated successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["dids", "update", "2000000", "--set", "status=Assigned"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated DID 2000000"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_choice_never_reaches_server() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["dids", "create", "--set", "trunkType=SIP"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Trunk Type"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_only_user_cannot_create() {
    let (server, sandbox) = logged_in("user").await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["customers", "create", "--set", "name=Initech", "--set", "email=a@b.test"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Admin access required"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_requires_confirmation_when_piped() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["mappings", "delete", "4"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(method("DELETE"))
        .and(path("/api/trunk-mappings/4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["mappings", "delete", "4", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted trunk mapping 4"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unknown_id_is_not_found() {
    let (server, sandbox) = logged_in("user").await;
    Mock::given(method("GET"))
        .and(path("/api/vno-trunks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["vno", "get", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("vno list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_asks_for_login() {
    let (server, sandbox) = logged_in("admin").await;
    Mock::given(method("GET"))
        .and(path("/api/nso-trunks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    sandbox
        .cmd()
        .args(["nso", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no longer valid"));
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_json_uses_wire_names() {
    let (server, sandbox) = logged_in("user").await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statsByAreaCode": {
                "212": {
                    "totalChannels": 100,
                    "allocatedChannels": 40,
                    "remainingChannels": 60,
                    "utilization": 40.0
                }
            },
            "totalNSOTrunks": 2,
            "totalVNOTrunks": 3,
            "totalDIDs": 5
        })))
        .mount(&server)
        .await;

    let output = sandbox
        .cmd()
        .args(["dashboard", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["statsByAreaCode"]["212"]["utilization"], 40);
    assert_eq!(stats["totalDIDs"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_dashboard_recomputes() {
    let (server, sandbox) = logged_in("user").await;
    let lists = [
        (
            "/api/nso-trunks",
            json!([
                { "id": 1, "serviceId": "A", "pilotNumber": "1", "channels": 30, "areaCode": "212", "status": "Active" },
                { "id": 2, "serviceId": "B", "pilotNumber": "2", "channels": 20, "areaCode": "415", "status": "Active" }
            ]),
        ),
        ("/api/vno-trunks", json!([])),
        (
            "/api/trunk-mappings",
            json!([{ "id": 1, "nsoTrunkId": 1, "vnoTrunkId": 9, "allocatedChannels": 10 }]),
        ),
        ("/api/dids", json!([])),
    ];
    for (route, body) in lists {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    sandbox
        .cmd()
        .args(["dashboard", "--local", "-o", "plain"])
        .assert()
        .success()
        .stdout("212\t33\n415\t0\n");
}
