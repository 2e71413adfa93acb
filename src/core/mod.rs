//! Core logic: local state files, persistence, and password hashing.

pub mod atomic;
pub mod authorized_keys;
pub mod config;
pub mod passwd_file;
pub mod password;
pub mod shadow_file;
pub mod sync;
