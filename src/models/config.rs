//! Client configuration file model.

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server addresses in failover order (`host:port`).
    #[serde(default)]
    pub servers: Vec<String>,

    #[serde(default)]
    pub pool: Option<String>,

    #[serde(default = "default_cert")]
    pub cert: PathBuf,

    #[serde(default = "default_shadow_path")]
    pub shadow_path: PathBuf,

    #[serde(default = "default_passwd_path")]
    pub passwd_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            pool: None,
            cert: default_cert(),
            shadow_path: default_shadow_path(),
            passwd_path: default_passwd_path(),
        }
    }
}

fn default_cert() -> PathBuf {
    PathBuf::from(constants::DEFAULT_CERT_PATH)
}

fn default_shadow_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_SHADOW_PATH)
}

fn default_passwd_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_PASSWD_PATH)
}
