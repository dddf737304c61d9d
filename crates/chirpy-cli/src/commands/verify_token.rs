//! Verify token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirpy_auth::SessionTokenCodec;

use crate::cli::AuthArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct VerifyTokenArgs {
    /// Session token to verify
    pub token: String,
}

pub fn run(args: VerifyTokenArgs, auth: &AuthArgs) -> Result<()> {
    let service = auth.service()?;
    let codec = SessionTokenCodec::new(service.config().token_secret())?;

    let session = codec.verify(&args.token).context("Token rejected")?;

    output::field("Subject", &session.subject.to_string());
    output::field("Issued", &session.issued_at.to_rfc3339());
    output::field("Expires", &session.expires_at.to_rfc3339());

    Ok(())
}
