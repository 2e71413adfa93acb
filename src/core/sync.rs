//! Per-account retrieval across the upstream and application to local files.

use crate::constants;
use crate::core::authorized_keys::AuthorizedKeysFile;
use crate::core::shadow_file::ShadowFile;
use crate::error::Error;
use crate::models::account::Account;
use crate::models::shadow::Shadows;
use crate::models::ssh_key::{AuthorizedKeys, SshKey};
use crate::upstream::retrieve;
use crate::upstream::ShadowdUpstream;
use crate::util::fs as client_fs;
use anyhow::Result;
use std::path::Path;
use tracing::{error, info, warn};

/// How to treat accounts every server says it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absent {
    Fail,
    Skip,
}

/// How to treat fetched accounts missing from the local shadow file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Reject,
    Append,
}

/// Fetch hashes for every account, one account at a time.
///
/// Host failures are absorbed by the upstream. Running out of hosts is
/// always fatal; an absent account is fatal unless `absent` is `Skip`.
pub fn fetch_shadows(
    upstream: &ShadowdUpstream,
    accounts: &[Account],
    absent: Absent,
) -> Result<Shadows, Error> {
    let mut shadows = Shadows::new();
    for account in accounts {
        match upstream.resolve(account, |host| retrieve::get_shadow(host, account)) {
            Ok(retrieved) => shadows.push(retrieved.shadow),
            Err(err) if err.is_absent() && absent == Absent::Skip => {
                warn!("skipping {}: {}", account, err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(shadows)
}

/// Fetch keys for every account. Accounts that fail are logged and left out.
pub fn fetch_authorized_keys(
    upstream: &ShadowdUpstream,
    accounts: &[Account],
) -> Result<AuthorizedKeys, Error> {
    let mut keys = AuthorizedKeys::new();
    for account in accounts {
        match upstream.resolve(account, |host| retrieve::get_keys(host, account)) {
            Ok(found) => {
                keys.insert(account.name.clone(), found);
            }
            Err(Error::NoHostsLeft) => return Err(Error::NoHostsLeft),
            Err(err) => error!("can't get ssh keys for {}: {}", account, err),
        }
    }
    Ok(keys)
}

/// Every account name the upstream knows under `pool`.
pub fn pool_accounts(upstream: &ShadowdUpstream, pool: &str) -> Result<Vec<String>, Error> {
    let subject = format!("pool {}", pool);
    let tokens = upstream.resolve(&subject, |host| retrieve::get_tokens(host, pool))?;
    Ok(retrieve::names_from_tokens(Some(pool), &tokens))
}

/// Rotate the password for `account` on the first host that knows it.
pub fn change_password(
    upstream: &ShadowdUpstream,
    account: &Account,
    old_password: &str,
    new_password: &str,
) -> Result<(), Error> {
    upstream.resolve(account, |host| {
        retrieve::change_password(host, account, old_password, new_password)
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub updated: usize,
    pub appended: usize,
}

/// Apply fetched hashes to the in-memory table. Nothing is written here.
pub fn apply_shadows(
    table: &mut ShadowFile,
    shadows: &Shadows,
    missing: Missing,
) -> Result<ApplyReport, Error> {
    let mut report = ApplyReport::default();
    for shadow in shadows {
        match missing {
            Missing::Reject => {
                table.set_record(shadow)?;
                report.updated += 1;
            }
            Missing::Append => {
                if table.upsert_record(shadow) {
                    report.appended += 1;
                } else {
                    report.updated += 1;
                }
            }
        }
        info!("shadow entry for {} updated", shadow.username);
    }
    Ok(report)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeysReport {
    pub added: usize,
    pub present: usize,
}

/// Write `keys` into an authorized_keys file, merging unless `overwrite`.
///
/// A missing parent directory is created 0700. Both directory and file are
/// handed to `owner` when given.
pub fn install_keys(
    path: &Path,
    keys: &[SshKey],
    overwrite: bool,
    owner: Option<(u32, u32)>,
) -> Result<KeysReport> {
    if let Some(dir) = path.parent() {
        if client_fs::ensure_dir(dir, constants::SSH_DIR_MODE)? {
            if let Some((uid, gid)) = owner {
                client_fs::set_owner(dir, uid, gid)?;
            }
        }
    }

    let mut file = if overwrite {
        AuthorizedKeysFile::fresh(path)
    } else {
        AuthorizedKeysFile::merge(path)?
    };

    let mut report = KeysReport::default();
    for key in keys {
        if file.add_key(key.clone()) {
            report.added += 1;
        } else {
            report.present += 1;
        }
    }

    file.persist()?;
    if let Some((uid, gid)) = owner {
        client_fs::set_owner(path, uid, gid)?;
    }
    Ok(report)
}
