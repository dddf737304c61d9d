//! Create user command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_core::Credentials;

use crate::cli::AuthArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    /// Email address used as the login identifier
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: CreateUserArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let credentials = Credentials::new(&args.email, &args.password);

    let user = service
        .register(&credentials)
        .await
        .context("Failed to create user")?;

    output::success("User created");
    output::field("ID", &user.id.to_string());
    output::field("Email", &user.email);

    Ok(())
}
