use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub const SECRET: &str = "cli-test-secret";
pub const API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// An isolated HOME and store directory for one test.
pub struct Sandbox {
    _dir: TempDir,
    pub home: PathBuf,
    pub store: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let store = dir.path().join("store");
        std::fs::create_dir_all(&home).unwrap();
        Self {
            _dir: dir,
            home,
            store,
        }
    }

    /// Path of the persisted session file.
    pub fn session_file(&self) -> PathBuf {
        self.home.join("data").join("chirpy").join("session.json")
    }

    /// Run the CLI binary with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        run_cli_with_env(args, &self.home, &self.store)
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_env(args: &[&str], home: &Path, store: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chirpy"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("CHIRPY_SECRET", SECRET);
    cmd.env("POLKA_KEY", API_KEY);
    cmd.env("CHIRPY_STORE", store);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}
