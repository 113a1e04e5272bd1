//! Batch coordinator behavior against a scripted in-process issuer, plus one
//! end-to-end batch through the HTTP client against a mock issuer.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gigid_core::{CredentialIssuanceRequest, DocumentKind, GovernmentDocument, SchemaDescriptor};
use gigid_issuance::{
    BatchCoordinator, BatchError, CredentialIssuer, CredentialRecord, CredentialStore, MemoryStore,
    NewWorker, StoreError, WorkerRecord, WorkerStats,
};
use gigid_issuer_client::{CredentialIssuanceResult, IssuanceError, IssuerClient, IssuerConfig};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Fixtures ─────────────────────────────────────────────────────────

/// Issuer that fails documents whose number is in `reject`, and otherwise
/// mints sequential credential ids.
#[derive(Default)]
struct ScriptedIssuer {
    reject: HashSet<String>,
    panic_on: HashSet<String>,
    delay_ms: Option<fn(&str) -> u64>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedIssuer {
    fn rejecting(numbers: &[&str]) -> Self {
        Self {
            reject: numbers.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialIssuer for ScriptedIssuer {
    async fn issue(
        &self,
        request: &CredentialIssuanceRequest,
    ) -> Result<CredentialIssuanceResult, IssuanceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let number = request.properties.document_number.clone();
        if let Some(delay) = self.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay(&number))).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(&number) {
            panic!("issuer blew up on {number}");
        }
        if self.reject.contains(&number) {
            return Err(IssuanceError::Status {
                endpoint: "POST /cred".into(),
                status: 400,
                message: "bad schema".into(),
            });
        }
        Ok(CredentialIssuanceResult {
            credential_id: format!("cred-{n:04}"),
            message: "VC issued successfully".into(),
            vc: Some(
                serde_json::from_value(serde_json::json!({
                    "credentialHash": format!("0x{n:x}"),
                    "credentialSubject": {"documentNumber": number}
                }))
                .unwrap(),
            ),
        })
    }
}

/// Store that accepts workers but refuses every credential write.
#[derive(Default)]
struct BrokenCredentialStore {
    inner: MemoryStore,
}

impl CredentialStore for BrokenCredentialStore {
    async fn create_credential(
        &self,
        _worker: &WorkerRecord,
        _credential_id: &str,
        _document_kind: &str,
        _serialized_vc: String,
    ) -> Result<CredentialRecord, StoreError> {
        Err(StoreError::Backend("connection reset by peer".into()))
    }

    async fn find_worker_by_external_id(
        &self,
        worker_id: &str,
    ) -> Result<Option<WorkerRecord>, StoreError> {
        self.inner.find_worker_by_external_id(worker_id).await
    }

    async fn list_credentials_for_worker(
        &self,
        worker: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        self.inner.list_credentials_for_worker(worker).await
    }

    async fn create_worker(&self, worker: WorkerRecord) -> Result<WorkerRecord, StoreError> {
        self.inner.create_worker(worker).await
    }

    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StoreError> {
        self.inner.list_workers().await
    }

    async fn worker_stats(&self) -> Result<WorkerStats, StoreError> {
        self.inner.worker_stats().await
    }
}

fn new_worker() -> NewWorker {
    NewWorker {
        full_name: "Ravi Kumar".into(),
        email: "ravi@example.in".into(),
        phone_number: "+91 90000 00001".into(),
        skills: vec!["delivery".into()],
        ..NewWorker::default()
    }
}

async fn onboarded_worker<S: CredentialStore>(store: &S) -> WorkerRecord {
    let mut worker = WorkerRecord::without_profile(new_worker());
    worker.address = Some("did:iota:0xravi".into());
    store.create_worker(worker).await.unwrap()
}

fn doc(kind: DocumentKind, number: &str) -> GovernmentDocument {
    GovernmentDocument::new("Ravi Kumar", kind, number, "Government of India")
}

fn coordinator<I: CredentialIssuer, S: CredentialStore>(
    issuer: &Arc<I>,
    store: &Arc<S>,
) -> BatchCoordinator<I, S> {
    BatchCoordinator::new(
        Arc::clone(issuer),
        Arc::clone(store),
        SchemaDescriptor::government_id(),
    )
}

// ── Batch semantics ──────────────────────────────────────────────────

#[tokio::test]
async fn empty_batch_makes_no_calls() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, vec![])
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 0);
    assert!(report.failures.is_empty());
    assert_eq!(issuer.calls(), 0);
}

#[tokio::test]
async fn one_failure_does_not_abort_siblings() {
    let issuer = Arc::new(ScriptedIssuer::rejecting(&["D2-NUM"]));
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let d1 = doc(DocumentKind::Pan, "D1-NUM");
    let d2 = doc(DocumentKind::Uan, "D2-NUM");
    let d3 = doc(DocumentKind::Passport, "D3-NUM");
    let d2_id = d2.id.clone();

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, vec![d1, d2, d3])
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.failures[0].document_id, d2_id);
    assert_eq!(report.failures[0].document_type, DocumentKind::Uan);
    assert_eq!(report.failures[0].error, "bad schema");
    assert_eq!(report.failures[0].orphaned_credential_id, None);

    let stored = store.list_credentials_for_worker(worker.id).await.unwrap();
    let kinds: HashSet<_> = stored.iter().map(|c| c.document_kind.as_str()).collect();
    assert_eq!(kinds, HashSet::from(["pan", "passport"]));
    for record in &stored {
        let vc: serde_json::Value = serde_json::from_str(&record.vc).unwrap();
        assert!(vc["credentialHash"].as_str().unwrap().starts_with("0x"));
    }
}

#[tokio::test]
async fn invalid_documents_fail_locally_without_issuer_call() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let mut dated = doc(DocumentKind::DrivingLicense, "DL-1");
    dated.issue_date = Some("18/10/2026".into());
    let docs = vec![
        doc(DocumentKind::Aadhaar, "  "),
        doc(DocumentKind::Other, "X-1"),
        dated,
        doc(DocumentKind::VotersId, "V-1"),
    ];

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, docs)
        .await
        .unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 3);
    assert_eq!(issuer.calls(), 1);
    assert_eq!(report.failures[0].error, "document number is required");
    assert_eq!(report.failures[1].document_type, DocumentKind::Other);
    assert!(report.failures[2].error.contains("18/10/2026"));
}

#[tokio::test]
async fn failures_are_reported_in_input_order() {
    // Later documents answer first.
    let issuer = Arc::new(ScriptedIssuer {
        reject: ["N0", "N1", "N2", "N3", "N4"].iter().map(|s| s.to_string()).collect(),
        delay_ms: Some(|number: &str| match number {
            "N0" => 50,
            "N1" => 40,
            "N2" => 30,
            "N3" => 20,
            _ => 10,
        }),
        ..ScriptedIssuer::default()
    });
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let docs: Vec<_> = (0..5)
        .map(|i| doc(DocumentKind::Pan, &format!("N{i}")))
        .collect();
    let expected: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, docs)
        .await
        .unwrap();

    let got: Vec<_> = report.failures.iter().map(|f| f.document_id.clone()).collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn concurrency_bound_is_respected() {
    let issuer = Arc::new(ScriptedIssuer {
        delay_ms: Some(|_| 20),
        ..ScriptedIssuer::default()
    });
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let docs: Vec<_> = (0..8)
        .map(|i| doc(DocumentKind::EducationCertificate, &format!("E{i}")))
        .collect();

    let report = coordinator(&issuer, &store)
        .with_max_concurrency(2)
        .issue_batch(&worker, docs)
        .await
        .unwrap();

    assert_eq!(report.success_count, 8);
    assert!(issuer.max_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn rerunning_a_batch_mints_new_credentials() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;
    let docs = vec![
        doc(DocumentKind::Pan, "P-1"),
        doc(DocumentKind::Aadhaar, "A-1").with_detail("address", "12 MG Road"),
    ];
    let coordinator = coordinator(&issuer, &store);

    let first = coordinator.issue_batch(&worker, docs.clone()).await.unwrap();
    let second = coordinator.issue_batch(&worker, docs).await.unwrap();

    let ids: HashSet<_> = first
        .issued
        .iter()
        .chain(second.issued.iter())
        .map(|c| c.credential_id.clone())
        .collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(store.credential_count(), 4);
}

#[tokio::test]
async fn empty_batch_for_worker_without_address_is_trivially_successful() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(MemoryStore::new());
    let worker = store
        .create_worker(WorkerRecord::without_profile(new_worker()))
        .await
        .unwrap();
    assert!(worker.holder_address().is_none());

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, vec![])
        .await
        .unwrap();

    assert_eq!(report.total, 0);
    assert!(report.issued.is_empty());
    assert_eq!(issuer.calls(), 0);
}

#[tokio::test]
async fn worker_without_address_aborts_before_any_call() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(MemoryStore::new());
    let worker = store
        .create_worker(WorkerRecord::without_profile(new_worker()))
        .await
        .unwrap();

    let err = coordinator(&issuer, &store)
        .issue_batch(&worker, vec![doc(DocumentKind::Pan, "P-1")])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BatchError::WorkerNotAddressable {
            worker_id: worker.worker_id.to_string()
        }
    );
    assert_eq!(issuer.calls(), 0);
}

#[tokio::test]
async fn store_failure_reports_orphaned_credential() {
    let issuer = Arc::new(ScriptedIssuer::default());
    let store = Arc::new(BrokenCredentialStore::default());
    let worker = onboarded_worker(&*store).await;

    let report = coordinator(&issuer, &store)
        .issue_batch(&worker, vec![doc(DocumentKind::Pan, "P-1")])
        .await
        .unwrap();

    assert_eq!(report.failure_count, 1);
    assert_eq!(report.success_count, 0);
    let failure = &report.failures[0];
    assert_eq!(failure.orphaned_credential_id.as_deref(), Some("cred-0001"));
    assert!(failure.error.contains("connection reset by peer"));
}

#[tokio::test]
async fn panicking_attempt_becomes_a_failure() {
    let issuer = Arc::new(ScriptedIssuer {
        panic_on: HashSet::from(["BOOM".to_string()]),
        ..ScriptedIssuer::default()
    });
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    let report = coordinator(&issuer, &store)
        .issue_batch(
            &worker,
            vec![doc(DocumentKind::Pan, "OK-1"), doc(DocumentKind::Uan, "BOOM")],
        )
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.failures[0].document_type, DocumentKind::Uan);
    assert!(report.failures[0].error.starts_with("issuance attempt aborted"));
}

// ── End to end through the HTTP client ───────────────────────────────

#[tokio::test]
async fn batch_against_mock_issuer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cred"))
        .and(body_partial_json(serde_json::json!({
            "properties": {"documentNumber": "BAD-1"}
        })))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "result": "error",
            "message": "bad schema"
        })))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cred"))
        .and(body_partial_json(serde_json::json!({
            "address": "did:iota:0xravi",
            "properties": {"verificationStatus": "PENDING"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "success",
            "credId": "abc123",
            "vc": {"credentialHash": "0xabc", "proof": {"type": "Ed25519Signature2020"}}
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = IssuerConfig::new(
        format!("{}/api/v1", mock_server.uri()).parse().unwrap(),
        "test-token",
    );
    let issuer = Arc::new(IssuerClient::new(config).unwrap());
    let store = Arc::new(MemoryStore::new());
    let worker = onboarded_worker(&*store).await;

    // The issuer answers both good documents with the same id, so the second
    // write is a conflict and surfaces as an orphan.
    let report = coordinator(&issuer, &store)
        .with_max_concurrency(1)
        .issue_batch(
            &worker,
            vec![
                doc(DocumentKind::Pan, "GOOD-1"),
                doc(DocumentKind::Uan, "BAD-1"),
                doc(DocumentKind::Passport, "GOOD-2"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 2);
    let errors: Vec<_> = report.failures.iter().map(|f| f.error.as_str()).collect();
    assert!(errors.contains(&"bad schema"));
    assert_eq!(
        report
            .failures
            .iter()
            .filter_map(|f| f.orphaned_credential_id.as_deref())
            .collect::<Vec<_>>(),
        vec!["abc123"]
    );

    let stored = store.list_credentials_for_worker(worker.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].credential_id, "abc123");
}
