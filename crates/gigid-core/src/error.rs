//! # Validation Errors
//!
//! Errors raised by the local half of the issuance pipeline. A
//! [`ValidationError`] never reaches the network: it is produced by the
//! normalizer or the payload builder and, inside a batch, becomes the
//! failure entry of the offending document.

use thiserror::Error;

/// Malformed input document or issuance target.
///
/// Each variant names the offending field so that operators can correct the
/// input without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `documentNumber` is empty or whitespace.
    #[error("document number is required")]
    MissingDocumentNumber,

    /// `issuingAuthority` is empty or whitespace.
    #[error("issuing authority is required")]
    MissingIssuingAuthority,

    /// `documentType == other` without a `customDocumentName`.
    #[error("a document name is required for documents of type \"other\"")]
    MissingCustomDocumentName,

    /// The credential would be addressed to no one.
    #[error("holder address is required")]
    EmptyHolderAddress,

    /// A worker identifier is empty.
    #[error("worker ID must be non-empty")]
    EmptyWorkerId,

    /// A date field is present but not an ISO `YYYY-MM-DD` date.
    #[error("invalid {field}: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The wire name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Kind-specific fields could not be read.
    #[error("invalid document details: {0}")]
    InvalidDetails(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_display() {
        assert!(ValidationError::MissingDocumentNumber
            .to_string()
            .contains("document number"));
        assert!(ValidationError::MissingIssuingAuthority
            .to_string()
            .contains("issuing authority"));
        assert!(ValidationError::MissingCustomDocumentName
            .to_string()
            .contains("\"other\""));
    }

    #[test]
    fn invalid_date_display_names_field_and_value() {
        let err = ValidationError::InvalidDate {
            field: "issueDate",
            value: "31/12/2020".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("issueDate"));
        assert!(msg.contains("31/12/2020"));
    }
}
