//! Centralized constants for paths, permissions, and protocol routes.

/// Default client configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/shadowc/shadowc.toml";

/// Default PEM certificate pinned as the only TLS root.
pub const DEFAULT_CERT_PATH: &str = "/etc/shadowc/cert.pem";

pub const DEFAULT_SHADOW_PATH: &str = "/etc/shadow";

pub const DEFAULT_PASSWD_PATH: &str = "/etc/passwd";

/// Route serving hash tables and token enumeration.
pub const HASH_ROUTE: &str = "t";

/// Route serving authorized SSH keys.
pub const SSH_ROUTE: &str = "ssh";

/// Scheme imposed on every host address.
pub const SCHEME: &str = "https";

/// Permission mode for a created `~/.ssh` directory.
pub const SSH_DIR_MODE: u32 = 0o700;

/// Permission mode for `authorized_keys`.
pub const AUTHORIZED_KEYS_MODE: u32 = 0o600;

/// Mode used for a shadow file that did not exist before.
pub const SHADOW_FILE_MODE: u32 = 0o640;

/// Form field carrying one proof hash per salt.
pub const PROOF_FIELD: &str = "shadow[]";

/// Form field carrying the new plaintext password.
pub const PASSWORD_FIELD: &str = "password";
