//! Data structures.

pub mod account;
pub mod config;
pub mod shadow;
pub mod ssh_key;
