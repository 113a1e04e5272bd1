//! # Credential Subcommand
//!
//! Looks up issued credentials at the issuer.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use gigid_issuer_client::IssuerClient;

use crate::{issuer_from_env, runtime};

/// Arguments for `gigid credential`.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub command: CredentialCommand,
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Fetch an issued credential by its issuer id.
    Get {
        /// Issuer-assigned credential id.
        #[arg(value_name = "ID")]
        id: String,
    },
}

/// Execute the credential subcommand.
pub fn run_credential(args: &CredentialArgs) -> Result<u8> {
    match &args.command {
        CredentialCommand::Get { id } => {
            let issuer = issuer_from_env()?;
            runtime()?.block_on(get_credential(&issuer, id))
        }
    }
}

/// Print the credential document, or NOT FOUND with exit code 1.
pub async fn get_credential(issuer: &IssuerClient, id: &str) -> Result<u8> {
    let document = issuer
        .credentials()
        .get(id)
        .await
        .with_context(|| format!("failed to fetch credential {id}"))?;

    match document {
        Some(document) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(0)
        }
        None => {
            println!("NOT FOUND: credential {id}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gigid_issuer_client::IssuerConfig;

    use super::*;

    async fn server_with(id: &str, template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/cred/{id}")))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn client(server: &MockServer) -> IssuerClient {
        IssuerClient::new(IssuerConfig::new(server.uri().parse().unwrap(), "token")).unwrap()
    }

    #[tokio::test]
    async fn found_credential_exits_zero() {
        let server = server_with(
            "abc123",
            ResponseTemplate::new(200).set_body_json(json!({"result": "success"})),
        )
        .await;
        assert_eq!(get_credential(&client(&server), "abc123").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_credential_exits_one() {
        let server = server_with("nope", ResponseTemplate::new(404)).await;
        assert_eq!(get_credential(&client(&server), "nope").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn issuer_error_is_an_error() {
        let server = server_with("abc123", ResponseTemplate::new(500)).await;
        let err = get_credential(&client(&server), "abc123").await.unwrap_err();
        assert!(err.to_string().contains("abc123"));
    }
}
