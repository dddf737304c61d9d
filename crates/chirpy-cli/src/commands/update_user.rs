//! Update user command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_auth::Scheme;
use chirpy_core::Credentials;

use super::authorization;
use crate::cli::AuthArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    /// New email address
    #[arg(long)]
    pub email: String,

    /// New password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: UpdateUserArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let mut session = storage::require_session().await?;

    let headers = authorization(Scheme::Bearer, &session.session_token)?;
    let credentials = Credentials::new(&args.email, &args.password);

    let user = service
        .update_credentials(&headers, &credentials)
        .await
        .context("Failed to update user")?;

    session.email = user.email.clone();
    storage::save_session(&session)
        .await
        .context("Failed to save session")?;

    output::success("User updated");
    output::field("ID", &user.id.to_string());
    output::field("Email", &user.email);

    Ok(())
}
