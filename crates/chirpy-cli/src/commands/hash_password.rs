//! Hash password command implementation.

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// Password to hash
    pub password: String,
}

pub fn run(args: HashPasswordArgs) -> Result<()> {
    let hash = chirpy_auth::hash_password(&args.password).context("Failed to hash password")?;
    println!("{}", hash.as_str());
    Ok(())
}
