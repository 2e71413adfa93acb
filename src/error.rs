//! Error kinds shared by the upstream protocol and the credential table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host answered, but does not know this token (HTTP 404 or 204).
    #[error("{token} is not found on {address}")]
    NotFound { address: String, token: String },

    /// Transport error or unexpected status; the host is unusable for this run.
    #[error("host {address} failed: {reason}")]
    HostFailure { address: String, reason: String },

    #[error("invalid server address '{0}': expected host:port without scheme")]
    InvalidAddress(String),

    #[error("invalid certificate {}: {reason}", .path.display())]
    InvalidCertificate { path: PathBuf, reason: String },

    #[error("user '{username}' is not found in shadow file {}", .path.display())]
    AccountNotFound { username: String, path: PathBuf },

    /// Every alive host answered NotFound.
    #[error("{subject} is not found on any server")]
    AllNotFound { subject: String },

    #[error("no shadowd servers left alive")]
    NoHostsLeft,

    #[error("crypt failed: {0}")]
    Crypt(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_host_failure(&self) -> bool {
        matches!(self, Self::HostFailure { .. })
    }

    /// Account absent everywhere, as opposed to the whole upstream being gone.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::AllNotFound { .. })
    }
}
