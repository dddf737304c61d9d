//! Embeds the version reported by `chirpy --version` as `CHIRPY_VERSION`.
//!
//! Uses `git describe` when built from a checkout, else the crate version.

use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if let Some(git_dir) = git_dir() {
        // Only existing paths; a missing one makes cargo rerun every build.
        for watched in [git_dir.join("HEAD"), git_dir.join("refs").join("tags")] {
            if watched.exists() {
                println!("cargo:rerun-if-changed={}", watched.display());
            }
        }
    }

    let version = describe().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=CHIRPY_VERSION={}", version);
}

/// Run git from the crate directory and return trimmed stdout on success.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Absolute path of the repository's git directory, wherever the workspace root is.
fn git_dir() -> Option<PathBuf> {
    let dir = PathBuf::from(git(&["rev-parse", "--git-dir"])?);
    if dir.is_absolute() {
        Some(dir)
    } else {
        Some(Path::new(env!("CARGO_MANIFEST_DIR")).join(dir))
    }
}

/// `v1.2.3-4-gabcdef` becomes `1.2.3-4-gabcdef`; untagged trees give the short hash.
fn describe() -> Option<String> {
    let described = git(&["describe", "--tags", "--always", "--dirty"])?;
    Some(
        described
            .strip_prefix('v')
            .map(str::to_string)
            .unwrap_or(described),
    )
}
