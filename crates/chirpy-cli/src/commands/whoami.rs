//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_auth::Scheme;
use chirpy_core::UserStore;

use super::authorization;
use crate::cli::AuthArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let session = storage::require_session().await?;

    let headers = authorization(Scheme::Bearer, &session.session_token)?;
    let user_id = service
        .authorize(&headers)
        .context("Session token rejected. Run 'chirpy refresh' or log in again.")?;

    let user = service
        .store()
        .get_user(&user_id)
        .await
        .context("Failed to load user")?
        .context("User no longer exists")?;

    output::field("ID", &user.id.to_string());
    output::field("Email", &user.email);
    output::field("Chirpy Red", if user.is_chirpy_red { "yes" } else { "no" });

    Ok(())
}
