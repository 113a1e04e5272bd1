//! # Government Documents
//!
//! The worker-supplied document record and its closed kind enumeration.
//!
//! A [`GovernmentDocument`] is loosely typed on the wire: besides the base
//! fields, it carries an open map of kind-specific keys (an Aadhaar card has
//! an address and an enrollment number, a driving license has vehicle
//! classes). The normalizer turns that map into a typed field set per
//! [`DocumentKind`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::lenient_string;

/// Kind of government document.
///
/// Serialized as the snake_case wire label (`"driving_license"`). Labels this
/// build does not know are preserved verbatim in [`DocumentKind::Unrecognized`]
/// so that new document kinds appearing in data do not break issuance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentKind {
    /// Aadhaar card (UIDAI).
    Aadhaar,
    /// Permanent Account Number card.
    Pan,
    /// Universal Account Number (EPFO).
    Uan,
    /// Voter ID card.
    VotersId,
    /// Driving license.
    DrivingLicense,
    /// Passport.
    Passport,
    /// Education certificate.
    EducationCertificate,
    /// Income certificate.
    IncomeCertificate,
    /// Caste certificate.
    CasteCertificate,
    /// Domicile certificate.
    DomicileCertificate,
    /// Birth certificate.
    BirthCertificate,
    /// Any other document; requires a custom display name.
    Other,
    /// A wire label this build does not recognize.
    Unrecognized(String),
}

impl DocumentKind {
    /// Every recognized kind, in display order.
    pub const KNOWN: [DocumentKind; 12] = [
        DocumentKind::Aadhaar,
        DocumentKind::Pan,
        DocumentKind::Uan,
        DocumentKind::VotersId,
        DocumentKind::DrivingLicense,
        DocumentKind::Passport,
        DocumentKind::EducationCertificate,
        DocumentKind::IncomeCertificate,
        DocumentKind::CasteCertificate,
        DocumentKind::DomicileCertificate,
        DocumentKind::BirthCertificate,
        DocumentKind::Other,
    ];

    /// Wire label of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Aadhaar => "aadhaar",
            Self::Pan => "pan",
            Self::Uan => "uan",
            Self::VotersId => "voters_id",
            Self::DrivingLicense => "driving_license",
            Self::Passport => "passport",
            Self::EducationCertificate => "education_certificate",
            Self::IncomeCertificate => "income_certificate",
            Self::CasteCertificate => "caste_certificate",
            Self::DomicileCertificate => "domicile_certificate",
            Self::BirthCertificate => "birth_certificate",
            Self::Other => "other",
            Self::Unrecognized(label) => label,
        }
    }

    /// Human-readable label for views.
    pub fn display_label(&self) -> &str {
        match self {
            Self::Aadhaar => "Aadhaar Card",
            Self::Pan => "PAN Card",
            Self::Uan => "UAN Number",
            Self::VotersId => "Voter ID Card",
            Self::DrivingLicense => "Driving License",
            Self::Passport => "Passport",
            Self::EducationCertificate => "Education Certificate",
            Self::IncomeCertificate => "Income Certificate",
            Self::CasteCertificate => "Caste Certificate",
            Self::DomicileCertificate => "Domicile Certificate",
            Self::BirthCertificate => "Birth Certificate",
            Self::Other => "Other Document",
            Self::Unrecognized(label) => label,
        }
    }
}

impl From<String> for DocumentKind {
    fn from(label: String) -> Self {
        match label.trim() {
            // "aadhar" is the spelling used by earlier dashboard builds.
            "aadhaar" | "aadhar" => Self::Aadhaar,
            "pan" => Self::Pan,
            "uan" => Self::Uan,
            "voters_id" => Self::VotersId,
            "driving_license" => Self::DrivingLicense,
            "passport" => Self::Passport,
            "education_certificate" => Self::EducationCertificate,
            "income_certificate" => Self::IncomeCertificate,
            "caste_certificate" => Self::CasteCertificate,
            "domicile_certificate" => Self::DomicileCertificate,
            "birth_certificate" => Self::BirthCertificate,
            "other" => Self::Other,
            _ => Self::Unrecognized(label),
        }
    }
}

impl From<&str> for DocumentKind {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<DocumentKind> for String {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A government document as entered by an operator for one worker.
///
/// Owned by the caller; the issuance pipeline only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentDocument {
    /// Client-side identifier, unique within a batch. Not a server key.
    #[serde(default = "generate_document_id")]
    pub id: String,
    /// Worker's full name at the time of entry.
    #[serde(default, deserialize_with = "lenient_string")]
    pub holder_name: String,
    /// Kind of document.
    pub document_type: DocumentKind,
    /// Display name; required when `document_type` is [`DocumentKind::Other`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_document_name: Option<String>,
    /// Number printed on the document.
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_number: String,
    /// Authority that issued the document.
    #[serde(default, deserialize_with = "lenient_string")]
    pub issuing_authority: String,
    /// ISO date of issue. Defaults to the issuance date when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    /// ISO date of expiry, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// URL of a previously uploaded scan. Opaque to the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Kind-specific fields (`address`, `vehicleTypes`, ...).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl GovernmentDocument {
    /// Start a document with the base fields; kind-specific details are empty.
    pub fn new(
        holder_name: impl Into<String>,
        document_type: DocumentKind,
        document_number: impl Into<String>,
        issuing_authority: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_document_id(),
            holder_name: holder_name.into(),
            document_type,
            custom_document_name: None,
            document_number: document_number.into(),
            issuing_authority: issuing_authority.into(),
            issue_date: None,
            expiry_date: None,
            file_url: None,
            details: Map::new(),
        }
    }

    /// Set a kind-specific field.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Name shown to operators: the custom name for `other`, else the kind label.
    pub fn display_name(&self) -> &str {
        match (&self.document_type, self.custom_document_name.as_deref()) {
            (DocumentKind::Other, Some(name)) if !name.trim().is_empty() => name,
            (kind, _) => kind.display_label(),
        }
    }
}

fn generate_document_id() -> String {
    format!("doc_{}", uuid::Uuid::new_v4().simple())
}
