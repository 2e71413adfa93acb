//! Shadowd upstream: hosts, transport, failover pool, and retrieval protocol.

pub mod host;
pub mod pool;
pub mod retrieve;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use host::ShadowdHost;
pub use pool::ShadowdUpstream;
