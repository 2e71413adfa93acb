//! Minimal /etc/passwd reader for key placement.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
}

impl PasswdEntry {
    pub fn authorized_keys_path(&self) -> PathBuf {
        self.home.join(".ssh").join("authorized_keys")
    }
}

/// Users with a real home directory, by name.
///
/// Entries with an empty or `/` home are left out.
pub fn load(path: &Path) -> Result<BTreeMap<String, PasswdEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read passwd file {}", path.display()))?;
    parse(&content).with_context(|| format!("parse passwd file {}", path.display()))
}

pub fn parse(content: &str) -> Result<BTreeMap<String, PasswdEntry>> {
    let mut users = BTreeMap::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 7 {
            bail!("invalid passwd entry on line {}: {}", idx + 1, line);
        }
        if fields[5].is_empty() || fields[5] == "/" {
            continue;
        }
        let uid = fields[2]
            .parse()
            .with_context(|| format!("invalid uid on line {}", idx + 1))?;
        let gid = fields[3]
            .parse()
            .with_context(|| format!("invalid gid on line {}", idx + 1))?;
        users.insert(
            fields[0].to_string(),
            PasswdEntry {
                name: fields[0].to_string(),
                uid,
                gid,
                home: PathBuf::from(fields[5]),
            },
        );
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_rootless_homes() {
        let users = parse(
            "root:x:0:0:root:/root:/bin/bash\n\
             nobody:x:65534:65534:nobody:/:/usr/bin/nologin\n\
             svc:x:999:999:svc::/usr/bin/nologin\n\
             alice:x:1000:1000:Alice:/home/alice:/bin/zsh\n",
        )
        .unwrap();
        assert_eq!(users.len(), 2);
        let alice = &users["alice"];
        assert_eq!(alice.uid, 1000);
        assert_eq!(alice.gid, 1000);
        assert_eq!(
            alice.authorized_keys_path(),
            PathBuf::from("/home/alice/.ssh/authorized_keys")
        );
    }

    #[test]
    fn test_short_entry_is_error() {
        assert!(parse("root:x:0:0:root:/root\n").is_err());
    }

    #[test]
    fn test_bad_uid_is_error() {
        assert!(parse("root:x:zero:0:root:/root:/bin/sh\n").is_err());
    }
}
