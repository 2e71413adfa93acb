//! Privilege checks for root enforcement.

use anyhow::{bail, Result};

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Require root for a given action, or bail with an error.
pub fn require_root(action: &str) -> Result<()> {
    if !is_root() {
        bail!("'{}' requires root privileges. Run with sudo.", action);
    }
    Ok(())
}

/// Name of the user running this process.
pub fn current_user() -> Result<String> {
    let uid = nix::unistd::getuid();
    match nix::unistd::User::from_uid(uid)? {
        Some(user) => Ok(user.name),
        None => bail!("no passwd entry for uid {}", uid),
    }
}
