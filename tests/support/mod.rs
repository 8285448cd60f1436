#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A scratch directory holding one store file.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("users.json")
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.path().join("users.json.backup")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_store(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("users.json", contents)
    }

    pub fn read_store(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `projman` running inside the scratch dir, with no `--store` flag.
    ///
    /// `HOME` and `XDG_CONFIG_HOME` point into the scratch dir so a real
    /// user config file is never picked up.
    pub fn bare_cmd(&self) -> Command {
        let home = self.dir.path().join("home");
        let mut cmd = projman_cmd();
        cmd.current_dir(self.dir())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"));
        cmd
    }

    /// `projman` pointed at this store, running inside the scratch dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--store").arg(self.path());
        cmd
    }

    /// Run with `--json`, expect success, and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output)?;
        Ok(value["data"].clone())
    }
}

pub fn projman_cmd() -> Command {
    let mut cmd = Command::cargo_bin("projman").expect("binary");
    cmd.env_remove("PROJMAN_STORE")
        .env_remove("PROJMAN_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
