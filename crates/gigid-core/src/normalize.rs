//! # Document Normalizer
//!
//! Maps a loosely-typed [`GovernmentDocument`] into a [`NormalizedDocument`]:
//! validated base fields plus the typed field set for its kind.
//!
//! ## Field Table
//!
//! | Kind | Fields |
//! |------|--------|
//! | `aadhaar` | address, dateOfBirth, gender, fatherName, motherName, mobileNumber, email, pincode, district, enrollmentNumber |
//! | `pan` | fatherName, dateOfBirth, category |
//! | `driving_license` | vehicleTypes, address, bloodGroup, dateOfBirth, emergencyContact |
//! | `uan` | employerName, dateOfJoining, designation, pfNumber |
//! | `education_certificate` | qualification, passingYear, percentage, grade, instituteName, subjects |
//! | `other` | customDocumentName |
//! | everything else | base fields only |
//!
//! Absent fields default to `""` (or `[]` for list fields), so every
//! recognized key is always present in the rendered property map.
//!
//! Normalization is deterministic: no clock, no randomness, no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::document::{DocumentKind, GovernmentDocument};
use crate::error::ValidationError;

/// Aadhaar-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AadhaarFields {
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub father_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mother_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mobile_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pincode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub district: String,
    #[serde(deserialize_with = "lenient_string")]
    pub enrollment_number: String,
}

/// PAN-specific fields. `category` defaults to `"Individual"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanFields {
    #[serde(deserialize_with = "lenient_string")]
    pub father_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
}

impl Default for PanFields {
    fn default() -> Self {
        Self {
            father_name: String::new(),
            date_of_birth: String::new(),
            category: PAN_DEFAULT_CATEGORY.to_string(),
        }
    }
}

const PAN_DEFAULT_CATEGORY: &str = "Individual";

/// Driving-license-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrivingLicenseFields {
    #[serde(deserialize_with = "lenient_list")]
    pub vehicle_types: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub blood_group: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub emergency_contact: String,
}

/// UAN (provident fund) fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UanFields {
    #[serde(deserialize_with = "lenient_string")]
    pub employer_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_joining: String,
    #[serde(deserialize_with = "lenient_string")]
    pub designation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pf_number: String,
}

/// Education certificate fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationFields {
    #[serde(deserialize_with = "lenient_string")]
    pub qualification: String,
    #[serde(deserialize_with = "lenient_string")]
    pub passing_year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub percentage: String,
    #[serde(deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institute_name: String,
    #[serde(deserialize_with = "lenient_list")]
    pub subjects: Vec<String>,
}

/// Typed kind-specific field set, one variant per field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFields {
    /// Aadhaar card fields.
    Aadhaar(AadhaarFields),
    /// PAN card fields.
    Pan(PanFields),
    /// UAN fields.
    Uan(UanFields),
    /// Driving license fields.
    DrivingLicense(DrivingLicenseFields),
    /// Education certificate fields.
    EducationCertificate(EducationFields),
    /// Free-form document with an operator-supplied name.
    Other {
        /// Display name of the document.
        custom_document_name: String,
    },
    /// Kinds without structured fields, including unrecognized ones.
    BaseOnly,
}

/// A validated document ready for payload construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Source document identifier.
    pub document_id: String,
    /// Document kind.
    pub kind: DocumentKind,
    /// Holder's full name.
    pub holder_name: String,
    /// Document number, trimmed.
    pub document_number: String,
    /// Issuing authority, trimmed.
    pub issuing_authority: String,
    /// Date of issue, if supplied.
    pub issue_date: Option<NaiveDate>,
    /// Date of expiry, if supplied.
    pub expiry_date: Option<NaiveDate>,
    /// Passthrough URL of the uploaded scan (`""` when absent).
    pub file_url: String,
    /// Kind-specific fields.
    pub fields: DocumentFields,
}

impl NormalizedDocument {
    /// Render the flat property map sent as `documentSpecificData`.
    ///
    /// Keys are ordered, so equal documents render byte-identical JSON.
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "documentNumber".into(),
            Value::String(self.document_number.clone()),
        );
        map.insert(
            "issuingAuthority".into(),
            Value::String(self.issuing_authority.clone()),
        );
        map.insert(
            "issueDate".into(),
            Value::String(self.issue_date.map(format_date).unwrap_or_default()),
        );
        map.insert("holderName".into(), Value::String(self.holder_name.clone()));

        let specific = match &self.fields {
            DocumentFields::Aadhaar(f) => serde_json::to_value(f),
            DocumentFields::Pan(f) => serde_json::to_value(f),
            DocumentFields::Uan(f) => serde_json::to_value(f),
            DocumentFields::DrivingLicense(f) => serde_json::to_value(f),
            DocumentFields::EducationCertificate(f) => serde_json::to_value(f),
            DocumentFields::Other {
                custom_document_name,
            } => Ok(serde_json::json!({ "customDocumentName": custom_document_name })),
            DocumentFields::BaseOnly => Ok(Value::Null),
        };
        // Field structs hold only strings and string lists; serialization cannot fail.
        if let Ok(Value::Object(fields)) = specific {
            map.extend(fields);
        }

        map.insert("fileUrl".into(), Value::String(self.file_url.clone()));
        map
    }
}

/// Normalize a government document.
///
/// # Errors
///
/// - [`ValidationError::MissingDocumentNumber`] / [`ValidationError::MissingIssuingAuthority`]
///   when a required base field is empty.
/// - [`ValidationError::MissingCustomDocumentName`] for `other` without a name.
/// - [`ValidationError::InvalidDate`] for a malformed `issueDate`/`expiryDate`.
pub fn normalize(doc: &GovernmentDocument) -> Result<NormalizedDocument, ValidationError> {
    let document_number = doc.document_number.trim();
    if document_number.is_empty() {
        return Err(ValidationError::MissingDocumentNumber);
    }
    let issuing_authority = doc.issuing_authority.trim();
    if issuing_authority.is_empty() {
        return Err(ValidationError::MissingIssuingAuthority);
    }

    let fields = match &doc.document_type {
        DocumentKind::Aadhaar => DocumentFields::Aadhaar(read_fields(&doc.details)?),
        DocumentKind::Pan => {
            let mut pan: PanFields = read_fields(&doc.details)?;
            if pan.category.trim().is_empty() {
                pan.category = PAN_DEFAULT_CATEGORY.to_string();
            }
            DocumentFields::Pan(pan)
        }
        DocumentKind::Uan => DocumentFields::Uan(read_fields(&doc.details)?),
        DocumentKind::DrivingLicense => DocumentFields::DrivingLicense(read_fields(&doc.details)?),
        DocumentKind::EducationCertificate => {
            DocumentFields::EducationCertificate(read_fields(&doc.details)?)
        }
        DocumentKind::Other => {
            let name = doc
                .custom_document_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(ValidationError::MissingCustomDocumentName)?;
            DocumentFields::Other {
                custom_document_name: name.to_string(),
            }
        }
        DocumentKind::VotersId
        | DocumentKind::Passport
        | DocumentKind::IncomeCertificate
        | DocumentKind::CasteCertificate
        | DocumentKind::DomicileCertificate
        | DocumentKind::BirthCertificate
        | DocumentKind::Unrecognized(_) => DocumentFields::BaseOnly,
    };

    Ok(NormalizedDocument {
        document_id: doc.id.clone(),
        kind: doc.document_type.clone(),
        holder_name: doc.holder_name.clone(),
        document_number: document_number.to_string(),
        issuing_authority: issuing_authority.to_string(),
        issue_date: parse_optional_date("issueDate", doc.issue_date.as_deref())?,
        expiry_date: parse_optional_date("expiryDate", doc.expiry_date.as_deref())?,
        file_url: doc.file_url.clone().unwrap_or_default(),
        fields,
    })
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn read_fields<T: for<'de> Deserialize<'de>>(
    details: &Map<String, Value>,
) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(details.clone()))
        .map_err(|e| ValidationError::InvalidDetails(e.to_string()))
}

/// Parse an optional ISO date. Empty strings count as absent; a full
/// RFC 3339 timestamp is accepted and truncated to its date.
fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.date_naive()))
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

/// Accept strings, numbers, and booleans for string fields; `null` is `""`.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// Accept a list of scalars or a comma-separated string; `null` is `[]`.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_to_string(other)],
    })
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
