//! Subcommand implementations.

mod create_user;
mod hash_password;
mod login;
mod refresh;
mod revoke;
mod update_user;
mod upgrade;
mod verify_token;
mod whoami;

use anyhow::{Context, Result};
use clap::Subcommand;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

use chirpy_auth::Scheme;

use crate::cli::AuthArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new user
    CreateUser(create_user::CreateUserArgs),

    /// Log in and store the issued tokens
    Login(login::LoginArgs),

    /// Display the user behind the stored session token
    Whoami(whoami::WhoamiArgs),

    /// Mint a new session token from the stored refresh token
    Refresh(refresh::RefreshArgs),

    /// Revoke the stored refresh token and forget the session
    Revoke(revoke::RevokeArgs),

    /// Change the email and password of the logged-in user
    UpdateUser(update_user::UpdateUserArgs),

    /// Deliver a payment webhook event
    Upgrade(upgrade::UpgradeArgs),

    /// Hash a password with bcrypt
    HashPassword(hash_password::HashPasswordArgs),

    /// Verify a session token and print its subject
    VerifyToken(verify_token::VerifyTokenArgs),
}

pub async fn handle(cmd: Command, auth: &AuthArgs) -> Result<()> {
    match cmd {
        Command::CreateUser(args) => create_user::run(args, auth).await,
        Command::Login(args) => login::run(args, auth).await,
        Command::Whoami(args) => whoami::run(args, auth).await,
        Command::Refresh(args) => refresh::run(args, auth).await,
        Command::Revoke(args) => revoke::run(args, auth).await,
        Command::UpdateUser(args) => update_user::run(args, auth).await,
        Command::Upgrade(args) => upgrade::run(args, auth).await,
        Command::HashPassword(args) => hash_password::run(args),
        Command::VerifyToken(args) => verify_token::run(args, auth),
    }
}

/// Build request headers carrying `Authorization: <scheme> <credential>`.
fn authorization(scheme: Scheme, credential: &str) -> Result<HeaderMap> {
    let value = HeaderValue::from_str(&format!("{} {}", scheme.literal(), credential))
        .context("Credential is not a valid header value")?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
