//! # gigid CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gigid_cli::credential::{run_credential, CredentialArgs};
use gigid_cli::issue::{run_issue, IssueArgs};
use gigid_cli::preview::{run_preview, PreviewArgs};
use gigid_cli::profile::{run_profile, ProfileArgs};

/// gigid: government-ID credentials for gig workers.
///
/// Previews and issues verifiable credentials for government documents,
/// mints DID profiles, and looks up issued credentials.
#[derive(Parser, Debug)]
#[command(name = "gigid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the issuer payloads for a documents file without sending them.
    Preview(PreviewArgs),

    /// Issue one credential per document for a DID address.
    Issue(IssueArgs),

    /// DID profile operations.
    Profile(ProfileArgs),

    /// Issued credential lookup.
    Credential(CredentialArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Preview(args) => run_preview(&args),
        Commands::Issue(args) => run_issue(&args),
        Commands::Profile(args) => run_profile(&args),
        Commands::Credential(args) => run_credential(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
