//! Account creation through the system `useradd` tool.

use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::info;

/// Create a local account with a home directory.
pub fn create_user(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('-') || name.contains(':') {
        bail!("refusing to create account with invalid name '{}'", name);
    }
    let mut cmd = Command::new("useradd");
    cmd.arg("--create-home").arg("--").arg(name);
    run(cmd).with_context(|| format!("useradd {}", name))?;
    info!("created account {}", name);
    Ok(())
}

fn run(mut cmd: Command) -> Result<()> {
    let output = cmd.output().context("run command")?;
    if output.status.success() {
        return Ok(());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("command failed: {}{}", stdout, stderr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_option_like_names() {
        assert!(create_user("").is_err());
        assert!(create_user("-o").is_err());
        assert!(create_user("a:b").is_err());
    }
}
