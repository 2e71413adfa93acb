//! Order-preserving, de-duplicating authorized_keys file.

use crate::constants;
use crate::core::atomic;
use crate::models::ssh_key::SshKey;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AuthorizedKeysFile {
    path: PathBuf,
    keys: Vec<SshKey>,
}

impl AuthorizedKeysFile {
    /// Empty key set; persisting overwrites whatever is on disk.
    pub fn fresh(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            keys: Vec::new(),
        }
    }

    /// Existing lines kept verbatim and in order, blank lines and repeats
    /// included. A missing file reads as empty.
    pub fn merge(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::fresh(path)),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("open authorized keys {}", path.display()))
            }
        };

        let mut merged = Self::fresh(path);
        for line in BufReader::new(file).lines() {
            let line =
                line.with_context(|| format!("read authorized keys {}", path.display()))?;
            merged.keys.push(SshKey::parse(&line));
        }
        Ok(merged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> &[SshKey] {
        &self.keys
    }

    /// Append unless an identical line is already present. Returns whether it was added.
    pub fn add_key(&mut self, key: SshKey) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in &self.keys {
            out.push_str(&key.raw);
            out.push('\n');
        }
        out
    }

    pub fn persist(&self) -> Result<()> {
        atomic::write(
            &self.path,
            self.render().as_bytes(),
            constants::AUTHORIZED_KEYS_MODE,
        )
        .with_context(|| format!("write authorized keys {}", self.path.display()))
    }
}
