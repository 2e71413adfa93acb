use anyhow::{Context, Result};
use nix::unistd::{chown, Gid, Uid};
use std::fs;
use std::path::Path;

use std::os::unix::fs::PermissionsExt;

/// Create `path` with `mode` if it does not exist. Returns whether it was created.
pub fn ensure_dir(path: &Path, mode: u32) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)
        .with_context(|| format!("create directory {}", path.display()))?;
    set_permissions(path, mode)?;
    Ok(true)
}

pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    let perm = fs::Permissions::from_mode(mode);
    fs::set_permissions(path, perm)
        .with_context(|| format!("set permissions {:o} on {}", mode, path.display()))
}

pub fn set_owner(path: &Path, uid: u32, gid: u32) -> Result<()> {
    chown(path, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid)))
        .with_context(|| format!("chown {}:{} {}", uid, gid, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_with_mode() {
        let dir = TempDir::new().unwrap();
        let ssh = dir.path().join(".ssh");
        assert!(ensure_dir(&ssh, 0o700).unwrap());
        let mode = fs::metadata(&ssh).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
        assert!(!ensure_dir(&ssh, 0o700).unwrap());
    }

    #[test]
    fn test_ensure_dir_leaves_existing_mode() {
        let dir = TempDir::new().unwrap();
        let ssh = dir.path().join(".ssh");
        fs::create_dir(&ssh).unwrap();
        set_permissions(&ssh, 0o750).unwrap();
        ensure_dir(&ssh, 0o700).unwrap();
        let mode = fs::metadata(&ssh).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
