//! detsig CLI
//!
//! Entry point for the `detsig` command-line tool. Exit codes: 0 for a
//! successful sign or a valid signature, 2 for everything else (invalid
//! signature or malformed inputs), matching the two-valued contract
//! automation already depends on.

use clap::{Parser, Subcommand};
use detsig::{run_sign, run_verify, VerifyOutcome};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "detsig")]
#[command(about = "Detached signing and verification of artifact digests", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an artifact's SHA-256 digest with a private key
    Sign {
        /// Path to the artifact to sign
        artifact: PathBuf,

        /// Path to the private key PEM (Ed25519, RSA, or EC P-256)
        #[arg(long)]
        key: PathBuf,

        /// Output path for the detached signature
        #[arg(long, default_value = "artifact.sig")]
        out: PathBuf,

        /// Name of an environment variable holding the key passphrase
        /// (for encrypted PKCS#8 keys; never pass the passphrase itself)
        #[arg(long, value_name = "VAR")]
        passphrase_env: Option<String>,
    },

    /// Verify a detached signature against an artifact
    ///
    /// The signature file is raw scheme bytes with no algorithm tag; the
    /// public key alone determines which scheme is checked.
    Verify {
        /// Path to the artifact to verify
        artifact: PathBuf,

        /// Path to the detached signature
        #[arg(long)]
        sig: PathBuf,

        /// Path to the public key PEM
        #[arg(long = "pub")]
        pubkey: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign {
            artifact,
            key,
            out,
            passphrase_env,
        } => {
            let passphrase = passphrase_env.map(|var| match std::env::var(&var) {
                Ok(value) => value,
                Err(_) => {
                    eprintln!("Signing error: passphrase variable {} is not set", var);
                    process::exit(2);
                }
            });

            match run_sign(
                &artifact,
                &key,
                &out,
                passphrase.as_deref().map(str::as_bytes),
            ) {
                Ok(outcome) => {
                    println!(
                        "Wrote signature to {} ({}, {} bytes, sha256 {})",
                        outcome.signature_path.display(),
                        outcome.algorithm,
                        outcome.signature_len,
                        outcome.digest_hex,
                    );
                }
                Err(e) => {
                    eprintln!("Signing error: {}", e);
                    process::exit(2);
                }
            }
        }

        Commands::Verify {
            artifact,
            sig,
            pubkey,
        } => match run_verify(&artifact, &sig, &pubkey) {
            Ok(VerifyOutcome::Valid { algorithm, .. }) => {
                println!("Verification OK ({}) for {}", algorithm, artifact.display());
            }
            Ok(VerifyOutcome::Invalid { reason }) => {
                eprintln!("Verification error: {}", reason);
                process::exit(2);
            }
            Err(e) => {
                eprintln!("Verification error: {}", e);
                process::exit(2);
            }
        },
    }
}
