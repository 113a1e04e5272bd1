//! # gigid-issuance -- Batch credential issuance
//!
//! Turns a worker's government documents into issued, locally recorded
//! verifiable credentials:
//!
//! ```text
//! GovernmentDocument -> normalize -> build -> CredentialIssuer -> CredentialStore
//! ```
//!
//! - [`coordinator`]: fan-out over a batch with per-document failure isolation.
//! - [`issuer`]: the [`CredentialIssuer`] seam, implemented by the HTTP client.
//! - [`store`]: the [`CredentialStore`] seam and the in-memory [`MemoryStore`].
//! - [`records`]: worker and credential records.

pub mod coordinator;
pub mod issuer;
pub mod records;
pub mod store;

pub use coordinator::{
    BatchCoordinator, BatchError, BatchFailure, BatchIssuanceReport, IssuedCredential, ItemError,
};
pub use issuer::CredentialIssuer;
pub use records::{
    BackgroundCheckStatus, CredentialRecord, Mnemonic, NewWorker, NewWorkerError,
    VerificationLevel, WorkerRecord, WorkerStats,
};
pub use store::{CredentialStore, MemoryStore, StoreError};
