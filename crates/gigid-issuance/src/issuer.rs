//! The issuer seam.
//!
//! The coordinator talks to the issuer only through [`CredentialIssuer`], so
//! tests can drive it with a scripted issuer and no network.

use std::future::Future;

use gigid_core::CredentialIssuanceRequest;
use gigid_issuer_client::{CredentialIssuanceResult, IssuanceError, IssuerClient};

/// Submits one issuance request to a credential issuer.
pub trait CredentialIssuer: Send + Sync + 'static {
    fn issue(
        &self,
        request: &CredentialIssuanceRequest,
    ) -> impl Future<Output = Result<CredentialIssuanceResult, IssuanceError>> + Send;
}

impl CredentialIssuer for IssuerClient {
    fn issue(
        &self,
        request: &CredentialIssuanceRequest,
    ) -> impl Future<Output = Result<CredentialIssuanceResult, IssuanceError>> + Send {
        self.credentials().issue(request)
    }
}
