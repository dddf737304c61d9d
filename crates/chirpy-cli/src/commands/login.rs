//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use chirpy_core::Credentials;

use crate::cli::AuthArgs;
use crate::output;
use crate::session::{StoredSession, storage};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address of the user
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Print the user and both tokens as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: LoginArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let login = service
        .login(&credentials)
        .await
        .context("Failed to login")?;

    let session = StoredSession {
        user_id: login.user.id,
        email: login.user.email.clone(),
        session_token: login.session_token.as_str().to_string(),
        refresh_token: login.refresh_token.clone(),
    };

    storage::save_session(&session)
        .await
        .context("Failed to save session")?;

    if args.json {
        return output::json_pretty(&json!({
            "id": login.user.id,
            "email": login.user.email,
            "created_at": login.user.created_at,
            "updated_at": login.user.updated_at,
            "is_chirpy_red": login.user.is_chirpy_red,
            "token": login.session_token.as_str(),
            "refresh_token": login.refresh_token.as_str(),
        }));
    }

    output::success("Logged in successfully");
    println!();
    output::field("ID", &login.user.id.to_string());
    output::field("Email", &login.user.email);

    Ok(())
}
