//! Line-indexed view of a shadow file.

use crate::constants;
use crate::core::atomic;
use crate::error::Error;
use crate::models::shadow::Shadow;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ShadowFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl ShadowFile {
    /// Read the whole file. Exactly one trailing newline is dropped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read shadow file {}", path.display()))?;
        Ok(Self::from_content(path, &content))
    }

    pub fn from_content(path: &Path, content: &str) -> Self {
        let content = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        Self {
            path: path.to_path_buf(),
            lines,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the first line for `username`.
    pub fn index_of(&self, username: &str) -> Result<usize, Error> {
        let prefix = format!("{}:", username);
        self.lines
            .iter()
            .position(|line| line.starts_with(&prefix))
            .ok_or_else(|| Error::AccountNotFound {
                username: username.to_string(),
                path: self.path.clone(),
            })
    }

    pub fn contains(&self, username: &str) -> bool {
        self.index_of(username).is_ok()
    }

    /// Replace the hash of an existing account. Never adds accounts.
    pub fn set_record(&mut self, shadow: &Shadow) -> Result<(), Error> {
        let index = self.index_of(&shadow.username)?;
        self.lines[index] = shadow.apply_to_line(&self.lines[index]);
        Ok(())
    }

    /// Replace the hash, or append a new record when the account is absent.
    /// Returns whether a record was appended.
    pub fn upsert_record(&mut self, shadow: &Shadow) -> bool {
        match self.set_record(shadow) {
            Ok(()) => false,
            Err(_) => {
                self.lines.push(shadow.to_string());
                true
            }
        }
    }

    /// Accounts whose hash field holds a usable crypt hash.
    ///
    /// Locked (`!`), disabled (`*`) and empty entries are not included.
    pub fn accounts_with_hashes(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| {
                let mut fields = line.splitn(3, ':');
                let name = fields.next()?;
                let hash = fields.next()?;
                if name.is_empty() || !hash.starts_with('$') {
                    return None;
                }
                Some(name.to_string())
            })
            .collect()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Atomically replace the file on disk.
    pub fn persist(&self) -> Result<()> {
        atomic::write(
            &self.path,
            self.render().as_bytes(),
            constants::SHADOW_FILE_MODE,
        )
        .with_context(|| format!("write shadow file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "root:$6$root:19000:0:99999:7:::\n\
daemon:*:19000:0:99999:7:::\n\
alice:!:19000:0:99999:7:::\n\
bob:$1$bob$x:19000:0:99999:7:::\n";

    fn sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("shadow");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load_trims_one_newline() {
        let table = ShadowFile::from_content(Path::new("s"), "a:x\nb:y\n\n");
        assert_eq!(table.lines(), &["a:x", "b:y", ""]);
        let empty = ShadowFile::from_content(Path::new("s"), "");
        assert!(empty.lines().is_empty());
    }

    #[test]
    fn test_index_of_requires_exact_name() {
        let table = ShadowFile::from_content(Path::new("s"), "alice2:x\nalice:y\n");
        assert_eq!(table.index_of("alice").unwrap(), 1);
        let err = table.index_of("ali").unwrap_err();
        assert!(matches!(err, Error::AccountNotFound { .. }));
    }

    #[test]
    fn test_set_record_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let path = sample(&dir);
        let mut table = ShadowFile::load(&path).unwrap();
        table.set_record(&Shadow::new("alice", "$6$new")).unwrap();
        table.persist().unwrap();

        let after = fs::read_to_string(&path).unwrap();
        let before_lines: Vec<&str> = SAMPLE.lines().collect();
        let after_lines: Vec<&str> = after.lines().collect();
        assert_eq!(after_lines.len(), before_lines.len());
        assert_eq!(after_lines[2], "alice:$6$new:19000:0:99999:7:::");
        for i in [0, 1, 3] {
            assert_eq!(after_lines[i], before_lines[i]);
        }
        assert!(after.ends_with('\n'));
    }

    #[test]
    fn test_set_record_never_adds() {
        let dir = TempDir::new().unwrap();
        let mut table = ShadowFile::load(&sample(&dir)).unwrap();
        let err = table.set_record(&Shadow::new("mallory", "$6$x")).unwrap_err();
        assert!(
            matches!(err, Error::AccountNotFound { ref username, .. } if username == "mallory")
        );
        assert_eq!(table.lines().len(), 4);
    }

    #[test]
    fn test_upsert_appends_nine_field_record() {
        let mut table = ShadowFile::from_content(Path::new("s"), SAMPLE);
        assert!(table.upsert_record(&Shadow::new("carol", "$6$c")));
        assert!(!table.upsert_record(&Shadow::new("bob", "$6$b")));
        assert_eq!(table.lines().len(), 5);
        assert_eq!(table.lines()[4], "carol:$6$c:::::::");
        assert_eq!(table.lines()[3], "bob:$6$b:19000:0:99999:7:::");
    }

    #[test]
    fn test_accounts_with_hashes() {
        let table = ShadowFile::from_content(Path::new("s"), SAMPLE);
        assert_eq!(table.accounts_with_hashes(), vec!["root", "bob"]);
    }

    #[test]
    fn test_write_to_matches_render() {
        let table = ShadowFile::from_content(Path::new("s"), SAMPLE);
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), SAMPLE);
        assert_eq!(table.render(), SAMPLE);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ShadowFile::load(Path::new("/nonexistent/shadow")).is_err());
    }
}
