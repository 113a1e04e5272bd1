//! End-to-end flow through the HTTP API against a mocked issuer:
//! onboard a worker, issue a batch with one rejected document, read the
//! worker back, verify a credential and check the dashboard counters.

use std::collections::BTreeSet;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gigid_api::state::{AppConfig, AppState};
use gigid_api::store::PersistentStore;
use gigid_core::SchemaDescriptor;
use gigid_issuer_client::{IssuerClient, IssuerConfig};

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Issuer mock: mints `cred-<documentNumber>` for every document except
/// `BAD-1`, which is rejected with "bad schema".
async fn mock_issuer() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/profile/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profileId": "prof-42",
            "address": "did:iota:0xmeena",
            "mnemonic": "legal winner thank year",
            "publicKey": "0xpub42",
            "createdAt": 1700000000000_i64
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cred"))
        .and(body_partial_json(json!({"properties": {"documentNumber": "BAD-1"}})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "result": "error",
            "message": "bad schema"
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cred"))
        .and(body_partial_json(json!({"address": "did:iota:0xmeena"})))
        .respond_with(|req: &wiremock::Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let number = body["properties"]["documentNumber"].as_str().unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "credId": format!("cred-{number}"),
                "vc": {"credentialHash": format!("0x{number}"), "proof": {"type": "Ed25519Signature2020"}}
            }))
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/cred/cred-ABCDE1234F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "credentialSubject": {"documentNumber": "ABCDE1234F"}
        })))
        .mount(&server)
        .await;

    server
}

fn app_for(server: &MockServer) -> Router {
    let issuer_config = IssuerConfig::new(
        format!("{}/api/v1", server.uri()).parse().unwrap(),
        "test-token",
    );
    let config = AppConfig {
        public_base_url: "https://gig.example".into(),
        max_concurrency: 2,
        ..AppConfig::default()
    };
    let state = AppState::build(
        config,
        PersistentStore::in_memory(),
        Some(IssuerClient::new(issuer_config).unwrap()),
        SchemaDescriptor::government_id(),
    );
    gigid_api::app(state)
}

#[tokio::test]
async fn onboard_issue_verify_flow() {
    let server = mock_issuer().await;
    let app = app_for(&server);

    // ── Onboard ──────────────────────────────────────────────────────
    let (status, created) = send(
        &app,
        post_json(
            "/v1/workers",
            json!({
                "fullName": "Meena Iyer",
                "email": "meena@example.in",
                "phoneNumber": "+91 90000 00042",
                "skills": ["cooking"],
                "platform": "Swiggy"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let worker_id = created["worker"]["workerId"].as_str().unwrap().to_string();
    assert_eq!(created["worker"]["address"], "did:iota:0xmeena");

    // ── Issue a batch of three, one of which the issuer rejects ──────
    let documents = json!({
        "documents": [
            {
                "id": "doc-pan",
                "holderName": "Meena Iyer",
                "documentType": "pan",
                "documentNumber": "ABCDE1234F",
                "issuingAuthority": "Income Tax Department"
            },
            {
                "id": "doc-voter",
                "holderName": "Meena Iyer",
                "documentType": "voters_id",
                "documentNumber": "BAD-1",
                "issuingAuthority": "Election Commission of India"
            },
            {
                "id": "doc-dl",
                "holderName": "Meena Iyer",
                "documentType": "driving_license",
                "documentNumber": "MH12-2019-0042",
                "issuingAuthority": "RTO Pune",
                "vehicleTypes": ["MCWG", "LMV"]
            }
        ]
    });
    let (status, report) = send(
        &app,
        post_json(&format!("/v1/workers/{worker_id}/credentials"), documents),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total"], 3);
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["failureCount"], 1);
    assert_eq!(report["failures"][0]["documentId"], "doc-voter");
    assert_eq!(report["failures"][0]["documentType"], "voters_id");
    assert_eq!(report["failures"][0]["error"], "bad schema");

    // ── Worker detail lists both recorded credentials ────────────────
    let (status, detail) = send(&app, get(&format!("/v1/workers/{worker_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let credentials = detail["credentials"].as_array().unwrap();
    let ids: BTreeSet<&str> = credentials
        .iter()
        .map(|c| c["credentialId"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        BTreeSet::from(["cred-ABCDE1234F", "cred-MH12-2019-0042"])
    );
    let pan = credentials
        .iter()
        .find(|c| c["credentialId"] == "cred-ABCDE1234F")
        .unwrap();
    assert_eq!(pan["documentKind"], "pan");
    assert_eq!(pan["documentLabel"], "PAN Card");
    assert_eq!(pan["vc"]["credentialHash"], "0xABCDE1234F");
    assert_eq!(
        pan["verificationUrl"],
        "https://gig.example/verify/credential/cred-ABCDE1234F"
    );

    // ── Public verification ──────────────────────────────────────────
    let (status, verified) = send(&app, get("/v1/credentials/cred-ABCDE1234F")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["isValid"], true);
    assert_eq!(verified["credentialSubject"]["documentNumber"], "ABCDE1234F");

    // ── Dashboard ────────────────────────────────────────────────────
    let (status, stats) = send(&app, get("/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({"total": 1, "verified": 0, "pending": 1, "active": 1}));
}

#[tokio::test]
async fn rerunning_a_batch_conflicts_on_reused_credential_ids() {
    let server = mock_issuer().await;
    let app = app_for(&server);

    let (_, created) = send(
        &app,
        post_json(
            "/v1/workers",
            json!({"fullName": "Meena Iyer", "email": "m@example.in", "phoneNumber": "1"}),
        ),
    )
    .await;
    let worker_id = created["worker"]["workerId"].as_str().unwrap().to_string();
    let uri = format!("/v1/workers/{worker_id}/credentials");
    let batch = json!({"documents": [{
        "documentType": "pan",
        "documentNumber": "ABCDE1234F",
        "issuingAuthority": "Income Tax Department"
    }]});

    let (_, first) = send(&app, post_json(&uri, batch.clone())).await;
    assert_eq!(first["successCount"], 1);

    // This mock issuer hands out the same id for the same number, so the
    // second record collides and the credential is reported as orphaned.
    let (status, second) = send(&app, post_json(&uri, batch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["failureCount"], 1);
    assert_eq!(second["failures"][0]["orphanedCredentialId"], "cred-ABCDE1234F");
}
