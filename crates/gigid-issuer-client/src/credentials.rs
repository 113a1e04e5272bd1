//! Typed client for the issuer's credential endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/cred` | Issue a verifiable credential |
//! | GET    | `/cred/{credId}` | Fetch an issued credential |
//!
//! ## Response envelope
//!
//! Issuance answers `{ "result": "success", "credId": "...", "vc": { ... } }`.
//! A 2xx answer is only a success when `result == "success"` and a `credId`
//! is present; anything else is reported as [`IssuanceError::Rejected`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gigid_core::CredentialIssuanceRequest;

use crate::config::IssuerConfig;
use crate::error::{error_message, IssuanceError};

const ISSUE_ENDPOINT: &str = "POST /cred";

/// A verifiable credential document as returned by the issuer.
///
/// The issuer owns the document layout, including the server-assigned
/// `issuanceDate`, `credentialHash` and `proof`, so it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiableCredential(Map<String, Value>);

impl VerifiableCredential {
    /// Consume into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Accept an object, or a string containing a JSON object.
    fn from_wire(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            Value::String(text) => match serde_json::from_str(&text) {
                Ok(Value::Object(map)) => Some(Self(map)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Successful issuance as reported by the issuer.
///
/// Failed attempts never produce one of these; they surface as
/// [`IssuanceError`] with the issuer's reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialIssuanceResult {
    /// Issuer-assigned credential identifier.
    pub credential_id: String,
    pub message: String,
    /// The issued document, when the issuer returned one.
    pub vc: Option<VerifiableCredential>,
}

/// The issuer is loose about scalar types here: ids and messages may arrive
/// as numbers, so they are decoded untyped and coerced with [`scalar_text`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    cred_id: Option<Value>,
    #[serde(default)]
    vc: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// Text of a string, number or boolean; `None` for anything else or blank.
fn scalar_text(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Client for the issuer credential endpoints.
#[derive(Debug, Clone)]
pub struct CredentialClient {
    http: reqwest::Client,
    config: IssuerConfig,
}

impl CredentialClient {
    pub(crate) fn new(http: reqwest::Client, config: IssuerConfig) -> Self {
        Self { http, config }
    }

    /// Submit one issuance request.
    ///
    /// Calls `POST {base_url}/cred` exactly once. No retries.
    pub async fn issue(
        &self,
        request: &CredentialIssuanceRequest,
    ) -> Result<CredentialIssuanceResult, IssuanceError> {
        let url = self.config.endpoint(&["cred"])?;
        tracing::debug!(
            document_type = %request.properties.document_type,
            "submitting credential issuance request"
        );

        let resp = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| IssuanceError::from_transport(ISSUE_ENDPOINT, self.config.timeout_secs, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| IssuanceError::from_transport(ISSUE_ENDPOINT, self.config.timeout_secs, e))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %message, "issuer refused credential");
            return Err(IssuanceError::Status {
                endpoint: ISSUE_ENDPOINT.into(),
                status: status.as_u16(),
                message,
            });
        }

        let envelope: IssueEnvelope =
            serde_json::from_str(&body).map_err(|e| IssuanceError::Deserialization {
                endpoint: ISSUE_ENDPOINT.into(),
                reason: e.to_string(),
            })?;

        let succeeded = envelope.result.as_ref().and_then(Value::as_str) == Some("success");
        match scalar_text(envelope.cred_id) {
            Some(cred_id) if succeeded => {
                tracing::info!(credential_id = %cred_id, "credential issued");
                Ok(CredentialIssuanceResult {
                    credential_id: cred_id,
                    message: "VC issued successfully".into(),
                    vc: envelope.vc.and_then(VerifiableCredential::from_wire),
                })
            }
            _ => Err(IssuanceError::Rejected {
                endpoint: ISSUE_ENDPOINT.into(),
                message: scalar_text(envelope.message)
                    .unwrap_or_else(|| "unknown error".into()),
            }),
        }
    }

    /// Fetch an issued credential document.
    ///
    /// Calls `GET {base_url}/cred/{cred_id}`. Returns `None` on 404.
    pub async fn get(&self, cred_id: &str) -> Result<Option<Value>, IssuanceError> {
        let endpoint = format!("GET /cred/{cred_id}");
        let url = self.config.endpoint(&["cred", cred_id])?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| IssuanceError::from_transport(&endpoint, self.config.timeout_secs, e))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IssuanceError::Status {
                endpoint,
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| IssuanceError::Deserialization {
                endpoint,
                reason: e.to_string(),
            })
    }
}
