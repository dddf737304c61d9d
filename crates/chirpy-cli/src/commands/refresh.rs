//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use chirpy_auth::Scheme;

use super::authorization;
use crate::cli::AuthArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let mut session = storage::require_session().await?;

    eprintln!("{}", "Refreshing session...".dimmed());

    let headers = authorization(Scheme::Bearer, session.refresh_token.as_str())?;
    let token = service
        .refresh(&headers)
        .await
        .context("Failed to refresh session")?;

    // The refresh token is not rotated; only the session token changes.
    session.session_token = token.into_string();
    storage::save_session(&session)
        .await
        .context("Failed to save refreshed session")?;

    output::success("Session refreshed successfully");
    output::field("ID", &session.user_id.to_string());

    Ok(())
}
