//! Contract tests for the access client.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/student/books/{id}/access` | `status_*` |
//! | POST   | `/api/student/books/{id}/enroll` | `enroll_*` |

use std::time::Duration;

use folio_client::{AccessBackend, ClientConfig, ClientError, FolioClient};
use folio_core::{AccessError, AuthContext, PackId, RequestStatus};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PACK: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

fn test_client(mock_server: &MockServer) -> FolioClient {
    let config = ClientConfig::new(&format!("{}/api", mock_server.uri())).unwrap();
    FolioClient::new(config).unwrap()
}

fn pack_id() -> PackId {
    PackId::new(PACK).unwrap()
}

fn student() -> AuthContext {
    AuthContext::bearer("student-token")
}

fn pending_request() -> serde_json::Value {
    serde_json::json!({
        "_id": "66b2a1d0c9e7f8a1b2c3d4e5",
        "status": "pending",
        "createdAt": "2026-02-10T09:30:00.000Z",
        "whatsappNumber": "+221770000000"
    })
}

// ── GET /student/books/{id}/access ───────────────────────────────────

#[tokio::test]
async fn status_returns_grant_and_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/student/books/{PACK}/access")))
        .and(header("authorization", "Bearer student-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessGranted": false,
            "request": pending_request()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let snapshot = client.access().status(&pack_id(), &student()).await.unwrap();
    assert!(!snapshot.grant);
    assert_eq!(snapshot.request_status(), Some(RequestStatus::Pending));
}

#[tokio::test]
async fn status_unauthenticated_classifies_as_auth_required() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/student/books/{PACK}/access")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Non authentifié" })),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.get_access_status(&pack_id(), &AuthContext::anonymous()).await;
    assert_eq!(result, Err(AccessError::AuthRequired));
}

#[tokio::test]
async fn status_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/student/books/{PACK}/access")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.get_access_status(&pack_id(), &student()).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn status_timeout_is_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/student/books/{PACK}/access")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "accessGranted": true }))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(&format!("{}/api", mock_server.uri()))
        .unwrap()
        .with_timeout_secs(1);
    let client = FolioClient::new(config).unwrap();
    let result = client.access().status(&pack_id(), &student()).await;
    assert!(matches!(result, Err(ClientError::Timeout { .. })));
}

// ── POST /student/books/{id}/enroll ──────────────────────────────────

#[tokio::test]
async fn enroll_sends_trimmed_contact_and_returns_pending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api/student/books/{PACK}/enroll")))
        .and(header("authorization", "Bearer student-token"))
        .and(body_json(serde_json::json!({ "whatsappNumber": "+221770000000" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "accessGranted": false,
            "request": pending_request(),
            "message": "Demande envoyée"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let receipt = client
        .access()
        .enroll(&pack_id(), Some("  +221770000000 "), &student())
        .await
        .unwrap();
    assert!(!receipt.grant);
    assert_eq!(receipt.message.as_deref(), Some("Demande envoyée"));
    assert_eq!(receipt.request.unwrap().status, RequestStatus::Pending);
}

#[tokio::test]
async fn enroll_without_contact_sends_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api/student/books/{PACK}/enroll")))
        .and(body_json(serde_json::json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessGranted": true,
            "request": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let receipt = client.submit_access_request(&pack_id(), None, &student()).await.unwrap();
    assert!(receipt.grant);
    assert!(receipt.request.is_none());
}

#[tokio::test]
async fn enroll_forbidden_carries_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api/student/books/{PACK}/enroll")))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({ "message": "Livre non publié" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.submit_access_request(&pack_id(), None, &student()).await;
    assert_eq!(
        result,
        Err(AccessError::Forbidden {
            message: "Livre non publié".into()
        })
    );
}

#[tokio::test]
async fn enroll_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api/student/books/{PACK}/enroll")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .submit_access_request(&pack_id(), None, &student())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
