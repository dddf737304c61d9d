//! CLI argument definitions.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use tracing::debug;

use chirpy_auth::{AuthConfig, AuthService};
use chirpy_file::FileStore;

use crate::commands::Command;

/// Chirpy credential and session-token tool.
#[derive(Parser, Debug)]
#[command(name = "chirpy")]
#[command(author, version = env!("CHIRPY_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command that touches the store.
#[derive(Args)]
pub struct AuthArgs {
    /// Session token signing secret
    #[arg(long, env = "CHIRPY_SECRET", global = true, hide_env_values = true)]
    pub secret: Option<String>,

    /// Operator key accepted by the payment webhook
    #[arg(long, env = "POLKA_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding users and refresh tokens
    #[arg(long, env = "CHIRPY_STORE", global = true, default_value = "chirpy-data")]
    pub store: PathBuf,
}

impl AuthArgs {
    /// Build the auth service from the secret, key and store directory.
    pub fn service(&self) -> Result<AuthService<FileStore>> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .context("No token secret. Set CHIRPY_SECRET or pass --secret.")?;

        // An exported but empty POLKA_KEY means no key.
        let api_key = self.api_key.clone().filter(|k| !k.is_empty());

        let config = AuthConfig::new(secret, api_key).context("Invalid auth configuration")?;
        debug!(store = %self.store.display(), "Opening file store");
        AuthService::new(config, FileStore::new(&self.store))
            .context("Failed to initialize auth service")
    }
}

impl fmt::Debug for AuthArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthArgs")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("store", &self.store)
            .finish()
    }
}
