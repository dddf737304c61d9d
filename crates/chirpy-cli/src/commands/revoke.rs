//! Revoke command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_auth::Scheme;

use super::authorization;
use crate::cli::AuthArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Revoke this refresh token instead of the stored one
    #[arg(long)]
    pub token: Option<String>,
}

pub async fn run(args: RevokeArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;

    if let Some(token) = args.token {
        let headers = authorization(Scheme::Bearer, &token)?;
        service
            .revoke(&headers)
            .await
            .context("Failed to revoke token")?;
        output::success("Refresh token revoked");
        return Ok(());
    }

    let session = storage::require_session().await?;
    let headers = authorization(Scheme::Bearer, session.refresh_token.as_str())?;
    service
        .revoke(&headers)
        .await
        .context("Failed to revoke token")?;

    storage::clear_session()
        .await
        .context("Failed to clear session")?;

    output::success("Refresh token revoked and session cleared");

    Ok(())
}
