//! Account-level retrieval on top of a single host.
//!
//! The server hands out a fresh hash table entry on every read, so two reads
//! in a row returning the same hash mean the entry was not rotated. That is
//! reported as a possible break-in (someone else read the entry, or the
//! server stopped rotating) but the hash is still used.

use crate::core::password;
use crate::error::Error;
use crate::models::account::{self, Account};
use crate::models::shadow::Shadow;
use crate::models::ssh_key::{parse_keys, SshKeys};
use crate::upstream::host::ShadowdHost;
use tracing::{debug, warn};

/// Anything that can hand out hash table entries by token.
pub trait HashSource {
    fn fetch_hash(&self, token: &str) -> Result<String, Error>;

    /// Name used in log lines.
    fn describe(&self) -> String;
}

impl HashSource for ShadowdHost {
    fn fetch_hash(&self, token: &str) -> Result<String, Error> {
        ShadowdHost::fetch_hash(self, token)
    }

    fn describe(&self) -> String {
        self.address().to_string()
    }
}

/// Outcome of the double read, kept for callers that report on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub shadow: Shadow,
    pub repeated: bool,
}

/// Fetch the hash for `account` twice and check it was rotated in between.
pub fn get_shadow(source: &dyn HashSource, account: &Account) -> Result<Retrieved, Error> {
    let token = account.token();
    let first = source.fetch_hash(&token)?;
    let second = source.fetch_hash(&token)?;

    let repeated = first == second;
    if repeated {
        warn!(
            host = %source.describe(),
            "hash for {} was not rotated between two reads: possible break-in attempt",
            account
        );
    } else {
        debug!(host = %source.describe(), "got hash for {}", account);
    }

    Ok(Retrieved {
        shadow: Shadow::new(account.name.clone(), second),
        repeated,
    })
}

pub fn get_keys(host: &ShadowdHost, account: &Account) -> Result<SshKeys, Error> {
    let body = host.fetch_keys(&account.token())?;
    Ok(parse_keys(&body))
}

/// Account names known under `pool`.
pub fn get_tokens(host: &ShadowdHost, pool: &str) -> Result<Vec<String>, Error> {
    host.fetch_tokens(pool)
}

/// Names recovered from enumerated tokens, in server order. Tokens outside
/// `pool` are logged and left out.
pub fn names_from_tokens(pool: Option<&str>, tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match account::name_from_token(pool, token) {
            Some(name) => Some(name.to_string()),
            None => {
                warn!("ignoring token {} outside pool {}", token, pool.unwrap_or("-"));
                None
            }
        })
        .collect()
}

/// Rotation handshake against one host.
///
/// The old password only ever leaves this function as crypt() proofs.
pub fn change_password(
    host: &ShadowdHost,
    account: &Account,
    old_password: &str,
    new_password: &str,
) -> Result<(), Error> {
    let token = account.token();
    let salts = host.fetch_change_salts(&token)?;
    debug!(host = %host, salts = salts.len(), "got change salts for {}", account);

    let proofs = salts
        .iter()
        .map(|salt| password::hash(old_password, salt))
        .collect::<Result<Vec<_>, _>>()?;

    host.submit_password_change(&token, &proofs, new_password)
}
