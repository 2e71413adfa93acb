//! Write-temp-then-rename persistence.
//!
//! The temp file is always created next to the target so the rename stays
//! on one filesystem. Until `commit` the original file is untouched.

use anyhow::{Context, Result};
use nix::unistd::{chown, Gid, Uid};
use std::fs;
use std::io::Write;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// New contents written and synced, waiting to replace the target.
pub struct StagedFile {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl StagedFile {
    pub fn temp_path(&self) -> &Path {
        self.tmp.path()
    }

    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.tmp
            .persist(&target)
            .map_err(|err| anyhow::anyhow!("persist {}: {}", target.display(), err))?;
        Ok(())
    }
}

/// Write `content` to a temp file beside `target`.
///
/// The temp file takes the target's mode and owner when the target exists,
/// `default_mode` otherwise. Dropping the result removes the temp file.
pub fn stage(target: &Path, content: &[u8], default_mode: u32) -> Result<StagedFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(content)
        .with_context(|| format!("write temp file for {}", target.display()))?;
    tmp.flush()
        .with_context(|| format!("flush temp file for {}", target.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for {}", target.display()))?;

    match fs::metadata(target) {
        Ok(existing) => {
            let perm = fs::Permissions::from_mode(existing.mode() & 0o7777);
            tmp.as_file()
                .set_permissions(perm)
                .with_context(|| format!("set permissions on temp file for {}", target.display()))?;
            copy_owner(&tmp, existing.uid(), existing.gid())
                .with_context(|| format!("set owner on temp file for {}", target.display()))?;
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(default_mode))
                .with_context(|| format!("set permissions on temp file for {}", target.display()))?;
        }
        Err(err) => {
            return Err(err).with_context(|| format!("stat {}", target.display()));
        }
    }

    Ok(StagedFile {
        target: target.to_path_buf(),
        tmp,
    })
}

fn copy_owner(tmp: &NamedTempFile, uid: u32, gid: u32) -> Result<()> {
    let current = tmp.as_file().metadata()?;
    if current.uid() == uid && current.gid() == gid {
        return Ok(());
    }
    chown(
        tmp.path(),
        Some(Uid::from_raw(uid)),
        Some(Gid::from_raw(gid)),
    )?;
    Ok(())
}

/// Atomically replace `target` with `content`.
pub fn write(target: &Path, content: &[u8], default_mode: u32) -> Result<()> {
    stage(target, content, default_mode)?.commit()
}
