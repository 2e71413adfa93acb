//! Ordered failover over shadowd hosts.

use crate::error::Error;
use crate::upstream::host::ShadowdHost;
use crate::upstream::transport::Transport;
use std::fmt::Display;
use std::rc::Rc;
use tracing::{debug, warn};

/// Hosts in failover priority order. The first alive host is always tried first.
#[derive(Debug)]
pub struct ShadowdUpstream {
    hosts: Vec<ShadowdHost>,
}

impl ShadowdUpstream {
    pub fn new(hosts: Vec<ShadowdHost>) -> Self {
        Self { hosts }
    }

    /// Build one host per address, all sharing `transport`.
    pub fn from_addresses<S: AsRef<str>>(
        addresses: &[S],
        transport: Rc<dyn Transport>,
    ) -> Result<Self, Error> {
        let hosts = addresses
            .iter()
            .map(|address| ShadowdHost::new(address.as_ref(), Rc::clone(&transport)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(hosts))
    }

    pub fn hosts(&self) -> &[ShadowdHost] {
        &self.hosts
    }

    /// Snapshot of alive hosts in original order.
    pub fn alive_hosts(&self) -> Result<Vec<&ShadowdHost>, Error> {
        let alive: Vec<&ShadowdHost> = self.hosts.iter().filter(|h| h.is_alive()).collect();
        if alive.is_empty() {
            return Err(Error::NoHostsLeft);
        }
        Ok(alive)
    }

    /// Run `op` against alive hosts in order until one succeeds.
    ///
    /// NotFound moves on to the next host and leaves the host alive. A host
    /// failure marks the host dead before moving on. Any other error comes
    /// from this side (crypt, local state) and is returned as is. The alive
    /// list is taken fresh on every call, so a host killed while resolving
    /// one subject is skipped for every later one.
    pub fn resolve<T, F>(&self, subject: &dyn Display, mut op: F) -> Result<T, Error>
    where
        F: FnMut(&ShadowdHost) -> Result<T, Error>,
    {
        let mut not_found = 0usize;
        for host in self.alive_hosts()? {
            match op(host) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_not_found() => {
                    debug!(host = %host, "{} is not found, trying next host", subject);
                    not_found += 1;
                }
                Err(err) if err.is_host_failure() => {
                    warn!(
                        host = %host,
                        error = %err,
                        "host failed while resolving {}, marking dead",
                        subject
                    );
                    host.mark_dead();
                }
                Err(err) => return Err(err),
            }
        }
        if not_found > 0 {
            Err(Error::AllNotFound {
                subject: subject.to_string(),
            })
        } else {
            Err(Error::NoHostsLeft)
        }
    }
}
