//! Common test utilities for mur integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A project directory plus an isolated home for the global `.murmurrc`
pub struct TestProject {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Working directory the binary runs in
    pub path: PathBuf,
    /// Global `.murmurrc` location
    pub global_rc: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");
        let global_rc = temp.path().join("home").join(".murmurrc");
        Self {
            temp,
            path,
            global_rc,
        }
    }

    /// Write a file relative to the project directory
    pub fn write_file(&self, path: &str, content: &str) {
        write(&self.path.join(path), content);
    }

    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    #[allow(dead_code)]
    pub fn write_global_rc(&self, content: &str) {
        write(&self.global_rc, content);
    }

    /// The mur binary running in this project with a scrubbed environment
    // Temporary fix for deprecated cargo_bin
    #[allow(deprecated)]
    pub fn mur(&self) -> Command {
        let mut cmd = Command::cargo_bin("mur").expect("mur binary");
        cmd.current_dir(&self.path)
            .env("MUR_GLOBAL_CONFIG", &self.global_rc)
            .env("MUR_CREDENTIALS", self.temp.path().join("credentials.json"))
            .env_remove("MURMUR_ACCESS_TOKEN")
            .env_remove("MURMUR_USERNAME")
            .env_remove("MURMUR_SERVER_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
