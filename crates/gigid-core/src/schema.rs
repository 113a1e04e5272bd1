//! # Credential Schema Descriptor
//!
//! The structural description of the credential shape that the issuer
//! expects in the `schema` field of an issuance request. Its contents are a
//! contract negotiated with the issuer, not derived from document data, so it
//! is treated as an opaque JSON document here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Opaque schema descriptor sent with every issuance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDescriptor(Value);

impl SchemaDescriptor {
    /// Wrap an issuer-provided schema document.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parse a schema document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self)
    }

    /// The built-in government-ID credential schema.
    pub fn government_id() -> Self {
        let string = json!({ "type": "string" });
        let date = json!({ "type": "string", "format": "date" });
        Self(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "GovernmentIdCredential",
            "description": "Verifiable credential attesting a government-issued identity document held by a gig worker.",
            "type": "object",
            "properties": {
                "holderName": string,
                "documentType": string,
                "documentNumber": string,
                "issuingAuthority": string,
                "issueDate": date,
                "expiryDate": { "type": ["string", "null"], "format": "date" },
                "verificationStatus": {
                    "type": "string",
                    "enum": ["PENDING", "VERIFIED", "REJECTED", "EXPIRED"]
                },
                "documentSpecificData": { "type": "object" },
                "digitalSignature": string,
                "isActive": { "type": "boolean" }
            },
            "required": [
                "holderName",
                "documentType",
                "documentNumber",
                "issuingAuthority",
                "issueDate",
                "verificationStatus",
                "isActive"
            ]
        }))
    }

    /// Access the underlying JSON document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self::government_id()
    }
}
