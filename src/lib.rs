//! Client for a centralized shadow hash and SSH key distribution service.
//!
//! Fetches password hashes and authorized keys for named accounts from an
//! ordered set of shadowd servers and applies them to local files.
//!
//! ## Modules
//! - `cli`: Command-line handlers
//! - `core`: Local state files, atomic persistence, orchestration
//! - `upstream`: Shadowd hosts, transport, failover pool
//! - `models`: Data structures
//! - `util`: System utilities (fs, privilege, useradd)

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod upstream;
pub mod util;

pub use error::Error;
