//! # Profile Subcommand
//!
//! Mints DID profiles at the issuer.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use gigid_issuer_client::{DidProfile, IssuerClient};

use crate::{issuer_from_env, runtime};

/// Arguments for `gigid profile`.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Create a new DID profile and print it, mnemonic included.
    Create,
}

/// Execute the profile subcommand.
pub fn run_profile(args: &ProfileArgs) -> Result<u8> {
    match &args.command {
        ProfileCommand::Create => {
            let issuer = issuer_from_env()?;
            let profile = runtime()?.block_on(create_profile(&issuer))?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(0)
        }
    }
}

/// Mint a DID profile.
pub async fn create_profile(issuer: &IssuerClient) -> Result<DidProfile> {
    let profile = issuer
        .profiles()
        .create()
        .await
        .context("DID profile creation failed")?;
    tracing::warn!(
        address = %profile.address,
        "the printed mnemonic is the only copy; store it securely"
    );
    Ok(profile)
}
