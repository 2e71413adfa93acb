//! Utility modules for filesystem, privilege, and account tooling.

pub mod fs;
pub mod privilege;
pub mod useradd;
