//! # Credential Payload Builder
//!
//! Combines a [`NormalizedDocument`], the holder's DID address, and the
//! [`SchemaDescriptor`] into the body of an issuance request:
//!
//! ```json
//! { "schema": { ... }, "properties": { ... }, "address": "did:..." }
//! ```
//!
//! Apart from reading the current date and generating the signature
//! placeholder, building is pure.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::DocumentKind;
use crate::error::ValidationError;
use crate::identity::HolderAddress;
use crate::normalize::{format_date, NormalizedDocument};
use crate::schema::SchemaDescriptor;

/// Verification state of a credential as recorded in its properties.
///
/// Issuance requests always start at [`VerificationStatus::Pending`]; the
/// issuer, not this pipeline, performs verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Awaiting verification by the issuer.
    Pending,
    /// Verified by the issuer.
    Verified,
    /// Rejected by the issuer.
    Rejected,
    /// Past its expiry date.
    Expired,
}

/// Locally generated `digitalSignature` placeholder.
///
/// **This value carries no cryptographic guarantee.** It is an opaque,
/// unique token (`0x` + millis + process sequence + 64 random bits) that
/// fills a slot in the credential properties. Real signing is done by the
/// issuer, which is the trust anchor for every credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderSignature(String);

static SIGNATURE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl PlaceholderSignature {
    /// Generate a fresh placeholder, unique across concurrent callers.
    pub fn generate() -> Self {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let seq = SIGNATURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let noise = OsRng.next_u64();
        Self(format!("0x{millis:012x}{seq:08x}{noise:016x}"))
    }

    /// The placeholder as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The `properties` object of an issuance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProperties {
    /// Holder's full name.
    pub holder_name: String,
    /// Document kind wire label.
    pub document_type: DocumentKind,
    /// Document number.
    pub document_number: String,
    /// Issuing authority.
    pub issuing_authority: String,
    /// Issue date, defaulted to the build date when the document had none.
    pub issue_date: String,
    /// Expiry date; serialized as `null` when absent.
    pub expiry_date: Option<String>,
    /// Always [`VerificationStatus::Pending`] on a fresh request.
    pub verification_status: VerificationStatus,
    /// The normalized kind-specific property map.
    pub document_specific_data: Map<String, Value>,
    /// Non-cryptographic placeholder; see [`PlaceholderSignature`].
    pub digital_signature: PlaceholderSignature,
    /// Always `true` on a fresh request.
    pub is_active: bool,
}

/// Body of `POST {issuer}/cred`. Constructed per attempt, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialIssuanceRequest {
    /// Credential schema negotiated with the issuer.
    pub schema: SchemaDescriptor,
    /// Credential properties.
    pub properties: CredentialProperties,
    /// DID address the credential is bound to.
    pub address: HolderAddress,
}

/// Build an issuance request dated today (UTC).
///
/// # Errors
///
/// [`ValidationError::EmptyHolderAddress`] when `holder_address` is empty or
/// whitespace, regardless of the document's content.
pub fn build(
    normalized: &NormalizedDocument,
    holder_address: &str,
    schema: &SchemaDescriptor,
) -> Result<CredentialIssuanceRequest, ValidationError> {
    build_on(normalized, holder_address, schema, Utc::now().date_naive())
}

/// Build an issuance request, defaulting a missing issue date to `today`.
pub fn build_on(
    normalized: &NormalizedDocument,
    holder_address: &str,
    schema: &SchemaDescriptor,
    today: NaiveDate,
) -> Result<CredentialIssuanceRequest, ValidationError> {
    let address = HolderAddress::new(holder_address)?;
    let issue_date = format_date(normalized.issue_date.unwrap_or(today));

    let mut document_specific_data = normalized.to_properties();
    document_specific_data.insert("issueDate".into(), Value::String(issue_date.clone()));

    Ok(CredentialIssuanceRequest {
        schema: schema.clone(),
        properties: CredentialProperties {
            holder_name: normalized.holder_name.clone(),
            document_type: normalized.kind.clone(),
            document_number: normalized.document_number.clone(),
            issuing_authority: normalized.issuing_authority.clone(),
            issue_date,
            expiry_date: normalized.expiry_date.map(format_date),
            verification_status: VerificationStatus::Pending,
            document_specific_data,
            digital_signature: PlaceholderSignature::generate(),
            is_active: true,
        },
        address,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::document::GovernmentDocument;
    use crate::normalize::normalize;
    use serde_json::json;

    fn normalized(kind: DocumentKind) -> NormalizedDocument {
        normalize(&GovernmentDocument::new(
            "Meena Iyer",
            kind,
            "ABCDE1234F",
            "Income Tax Department",
        ))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn request_serializes_to_issuer_shape() {
        let req = build_on(
            &normalized(DocumentKind::Pan),
            "did:iota:0x42",
            &SchemaDescriptor::government_id(),
            today(),
        )
        .unwrap();
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["address"], json!("did:iota:0x42"));
        assert_eq!(body["schema"]["title"], json!("GovernmentIdCredential"));
        let props = &body["properties"];
        assert_eq!(props["holderName"], json!("Meena Iyer"));
        assert_eq!(props["documentType"], json!("pan"));
        assert_eq!(props["documentNumber"], json!("ABCDE1234F"));
        assert_eq!(props["issuingAuthority"], json!("Income Tax Department"));
        assert_eq!(props["issueDate"], json!("2026-10-18"));
        assert_eq!(props["expiryDate"], Value::Null);
        assert_eq!(props["verificationStatus"], json!("PENDING"));
        assert_eq!(props["isActive"], json!(true));
        assert_eq!(props["documentSpecificData"]["category"], json!("Individual"));
        assert_eq!(
            props["documentSpecificData"]["issueDate"],
            json!("2026-10-18")
        );
        assert!(props["digitalSignature"]
            .as_str()
            .unwrap()
            .starts_with("0x"));
    }

    #[test]
    fn supplied_issue_date_wins_over_default() {
        let mut doc = GovernmentDocument::new("A", DocumentKind::Passport, "P1", "MEA");
        doc.issue_date = Some("2019-06-01".into());
        doc.expiry_date = Some("2029-05-31".into());
        let req = build_on(
            &normalize(&doc).unwrap(),
            "did:x:1",
            &SchemaDescriptor::default(),
            today(),
        )
        .unwrap();
        assert_eq!(req.properties.issue_date, "2019-06-01");
        assert_eq!(req.properties.expiry_date.as_deref(), Some("2029-05-31"));
    }

    #[test]
    fn build_uses_current_date() {
        let req = build(
            &normalized(DocumentKind::VotersId),
            "did:x:1",
            &SchemaDescriptor::default(),
        )
        .unwrap();
        let parsed = NaiveDate::parse_from_str(&req.properties.issue_date, "%Y-%m-%d");
        assert!(parsed.is_ok());
    }

    #[test]
    fn verification_status_always_pending() {
        for kind in DocumentKind::KNOWN {
            if kind == DocumentKind::Other {
                continue;
            }
            let req = build_on(
                &normalized(kind),
                "did:x:1",
                &SchemaDescriptor::default(),
                today(),
            )
            .unwrap();
            assert_eq!(req.properties.verification_status, VerificationStatus::Pending);
            assert!(req.properties.is_active);
        }
    }

    #[test]
    fn signatures_are_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..500)
                        .map(|_| PlaceholderSignature::generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for sig in handle.join().unwrap() {
                assert!(seen.insert(sig), "duplicate placeholder signature");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn blank_holder_address_is_always_rejected(
                address in "[ \t\n]{0,8}",
                number in "[A-Z0-9]{1,12}",
            ) {
                let doc = GovernmentDocument::new("H", DocumentKind::Aadhaar, number, "UIDAI")
                    .with_detail("address", "12 MG Road");
                let err = build_on(
                    &normalize(&doc).unwrap(),
                    &address,
                    &SchemaDescriptor::default(),
                    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                )
                .unwrap_err();
                prop_assert_eq!(err, ValidationError::EmptyHolderAddress);
            }
        }
    }
}
