//! # gigid-core: Foundational Types for gigid
//!
//! This crate defines the document model and the pure half of the credential
//! issuance pipeline. It has no internal crate dependencies and performs no
//! I/O: only `serde`, `serde_json`, `thiserror`, `chrono`, `uuid`, and
//! `rand_core` from the external ecosystem.
//!
//! ## Pipeline
//!
//! ```text
//! GovernmentDocument ──normalize──▶ NormalizedDocument ──build──▶ CredentialIssuanceRequest
//! ```
//!
//! Both stages are synchronous and never suspend. The network half (issuer
//! client, batch coordinator) lives in `gigid-issuer-client` and
//! `gigid-issuance`.
//!
//! ## Design Principles
//!
//! 1. **Closed [`DocumentKind`] enum.** Every kind-specific field mapping is an
//!    exhaustive `match`. Adding a kind without updating the normalizer does
//!    not compile.
//!
//! 2. **Validation at the boundary.** Malformed documents are rejected with a
//!    [`ValidationError`] before anything reaches the network.
//!
//! 3. **Newtype wrappers for identifiers.** A [`WorkerId`] cannot be passed
//!    where a [`HolderAddress`] is expected.

pub mod document;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod payload;
pub mod schema;

pub use document::{DocumentKind, GovernmentDocument};
pub use error::ValidationError;
pub use identity::{HolderAddress, WorkerId};
pub use normalize::{normalize, DocumentFields, NormalizedDocument};
pub use payload::{
    build, build_on, CredentialIssuanceRequest, CredentialProperties, PlaceholderSignature,
    VerificationStatus,
};
pub use schema::SchemaDescriptor;
