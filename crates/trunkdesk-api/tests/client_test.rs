#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trunkdesk_api::auth::StaticToken;
use trunkdesk_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: StaticToken) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&server.uri(), &TransportConfig::default(), Arc::new(token))
        .unwrap();
    (server, client)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Customer {
    id: u64,
    name: String,
    email: String,
    phone: Option<String>,
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_without_bearer() {
    let (server, client) = setup(StaticToken::new("stale-token")).await;

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

    let password = SecretString::from("admin123".to_string());
    let login = client.login("admin", &password).await.unwrap();

    assert_eq!(login.token, "jwt-abc");
    assert_eq!(login.role, "admin");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let (server, client) = setup(StaticToken::none()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("nope".to_string());
    let result = client.login("admin", &password).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_malformed_body_is_auth_error() {
    let (server, client) = setup(StaticToken::none()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let password = SecretString::from("admin123".to_string());
    let result = client.login("admin", &password).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Collection tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Acme", "email": "ops@acme.test", "phone": null },
            { "id": 2, "name": "Globex", "email": "noc@globex.test", "phone": "555-0100" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let customers: Vec<Customer> = client.list("customers").await.unwrap();

    assert_eq!(
        customers,
        vec![
            Customer {
                id: 1,
                name: "Acme".into(),
                email: "ops@acme.test".into(),
                phone: None,
            },
            Customer {
                id: 2,
                name: "Globex".into(),
                email: "noc@globex.test".into(),
                phone: Some("555-0100".into()),
            },
        ]
    );
}

#[tokio::test]
async fn test_create_returns_server_id() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("POST"))
        .and(path("/api/trunk-mappings"))
        .and(body_json(json!({
            "nsoTrunkId": 1,
            "vnoTrunkId": 4,
            "allocatedChannels": 10
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "message": "Created successfully", "id": 42 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create(
            "trunk-mappings",
            &json!({ "nsoTrunkId": 1, "vnoTrunkId": 4, "allocatedChannels": 10 }),
        )
        .await
        .unwrap();

    assert_eq!(created.id, 42);
}

#[tokio::test]
async fn test_update_puts_to_record_path() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("PUT"))
        .and(path("/api/dids/2000000"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Updated successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .update("dids", 2_000_000, &json!({ "didNumber": "2125550100" }))
        .await
        .unwrap();
    assert_eq!(resp.message, "Updated successfully");
}

#[tokio::test]
async fn test_remove_unknown_id_is_not_found() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("DELETE"))
        .and(path("/api/nso-trunks/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"))
        .mount(&server)
        .await;

    let err = client.remove("nso-trunks", 99).await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (server, client) = setup(StaticToken::none()).await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is missing" })),
        )
        .mount(&server)
        .await;

    let err = client.dashboard().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let (server, client) = setup(StaticToken::new("user-token")).await;

    Mock::given(method("POST"))
        .and(path("/api/customers"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "message": "Admin access required" })),
        )
        .mount(&server)
        .await;

    let err = client
        .create("customers", &json!({ "name": "x", "email": "y", "phone": "" }))
        .await
        .unwrap_err();

    match err {
        Error::Forbidden { message } => assert_eq!(message, "Admin access required"),
        other => panic!("expected Forbidden, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/vno-trunks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list::<serde_json::Value>("vno-trunks").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.dashboard().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

// ── Dashboard tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_parses_wire_names() {
    let (server, client) = setup(StaticToken::new("jwt-abc")).await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statsByAreaCode": {
                "212": {
                    "totalChannels": 100,
                    "allocatedChannels": 30,
                    "remainingChannels": 70,
                    "utilization": 30.0
                }
            },
            "totalNSOTrunks": 2,
            "totalVNOTrunks": 5,
            "totalDIDs": 17
        })))
        .mount(&server)
        .await;

    let dash = client.dashboard().await.unwrap();

    assert_eq!(dash.total_nso_trunks, 2);
    assert_eq!(dash.total_vno_trunks, 5);
    assert_eq!(dash.total_dids, 17);
    let stats = &dash.stats_by_area_code["212"];
    assert_eq!(stats.total_channels, 100);
    assert_eq!(stats.allocated_channels, 30);
    assert_eq!(stats.remaining_channels, 70);
}
