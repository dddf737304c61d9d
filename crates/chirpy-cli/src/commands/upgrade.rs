//! Payment webhook command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_auth::{Scheme, UPGRADE_EVENT, WebhookOutcome};
use chirpy_core::UserId;

use super::authorization;
use crate::cli::AuthArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// User the event refers to
    #[arg(long)]
    pub user_id: UserId,

    /// Event name sent by the payment provider
    #[arg(long, default_value = UPGRADE_EVENT)]
    pub event: String,

    /// Key to present in the ApiKey header (defaults to the configured key)
    #[arg(long)]
    pub key: Option<String>,
}

pub async fn run(args: UpgradeArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;

    let key = args
        .key
        .or_else(|| auth.api_key.clone())
        .context("No API key to present. Pass --key or set POLKA_KEY.")?;
    let headers = authorization(Scheme::ApiKey, &key)?;

    let outcome = service
        .handle_payment_event(&headers, &args.event, &args.user_id)
        .await
        .context("Webhook rejected")?;

    match outcome {
        WebhookOutcome::Upgraded(id) => {
            output::success("User upgraded to Chirpy Red");
            output::field("ID", &id.to_string());
        }
        WebhookOutcome::Ignored => {
            output::warning(&format!("Event '{}' ignored", args.event));
        }
    }

    Ok(())
}
