//! jau-passkey developer tool

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jau_passkey::passkey::{codec, CapabilityChecker, ExecutionContext, RegistrationOptionsJson, RetrievalOptionsJson};
use jau_passkey::PasskeyConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode credential creation options (bare, or wrapped in a provider response)
    InspectCreation {
        file: PathBuf,
    },

    /// Decode credential request options (bare, or wrapped in challenge parameters)
    InspectRequest {
        file: PathBuf,
    },

    /// Report whether passkeys are available for a web origin
    CheckOrigin {
        origin: String,

        /// The host exposes no credential management API
        #[arg(long)]
        no_credentials_api: bool,
    },

    /// Print the resolved identity provider configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jau_passkey=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InspectCreation { file } => inspect_creation(&file),
        Commands::InspectRequest { file } => inspect_request(&file),
        Commands::CheckOrigin { origin, no_credentials_api } => {
            let context = ExecutionContext::for_origin(&origin, !no_credentials_api);
            if context.is_supported() {
                println!("{} passkeys are available on {}", "✓".green(), origin);
            } else {
                println!("{} passkeys are not available on {}", "✗".red(), origin);
                if !context.is_secure_context {
                    println!("  origin is not a secure context");
                }
            }
            Ok(())
        }
        Commands::Config => {
            let config = PasskeyConfig::from_env().context("failed to load configuration")?;
            println!("{:<10} {}", "client id".bold(), config.client_id);
            println!("{:<10} {}", "region".bold(), config.region().unwrap_or_else(|| "-".into()));
            println!("{:<10} {}", "endpoint".bold(), config.endpoint()?);
            Ok(())
        }
    }
}

/// Read a JSON file and unwrap `key` if the document is an envelope
fn read_options(path: &Path, key: &str) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut value: Value = serde_json::from_str(&text).context("file is not valid JSON")?;

    if let Some(inner) = value.get_mut(key).map(Value::take) {
        value = match inner {
            Value::String(s) => serde_json::from_str(&s).context("wrapped options are not valid JSON")?,
            Value::Null => bail!("{} is empty", key),
            other => other,
        };
    }
    Ok(value)
}

fn inspect_creation(path: &Path) -> anyhow::Result<()> {
    let json: RegistrationOptionsJson =
        serde_json::from_value(read_options(path, "CredentialCreationOptions")?)?;
    let options = codec::to_registration_options(json)?;

    println!("{}", "Credential creation options".bold());
    println!("  relying party   {} ({})", options.rp.name, options.rp.id.as_deref().unwrap_or("-"));
    println!("  user            {} / {}", options.user.name, options.user.display_name);
    println!("  user handle     {} bytes", options.user.id.len());
    println!("  challenge       {} bytes", options.challenge.len());
    let algs: Vec<String> = options.pub_key_cred_params.iter().map(|p| p.alg.to_string()).collect();
    println!("  algorithms      {}", algs.join(", "));
    println!("  excluded        {}", options.exclude_credentials.len());
    if let Some(timeout) = options.timeout {
        println!("  timeout         {} ms", timeout);
    }
    Ok(())
}

fn inspect_request(path: &Path) -> anyhow::Result<()> {
    let json: RetrievalOptionsJson = serde_json::from_value(read_options(
        path,
        jau_passkey::sign_in::CREDENTIAL_REQUEST_OPTIONS,
    )?)?;
    let options = codec::to_retrieval_options(json)?;

    println!("{}", "Credential request options".bold());
    println!("  relying party   {}", options.rp_id.as_deref().unwrap_or("-"));
    println!("  challenge       {} bytes", options.challenge.len());
    println!("  allowed         {}", options.allow_credentials.len());
    if let Some(uv) = options.user_verification {
        println!("  verification    {}", uv);
    }
    if let Some(timeout) = options.timeout {
        println!("  timeout         {} ms", timeout);
    }
    Ok(())
}
