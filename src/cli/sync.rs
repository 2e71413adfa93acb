use crate::cli::CliContext;
use crate::core::passwd_file;
use crate::core::shadow_file::ShadowFile;
use crate::core::sync::{self, Absent, Missing};
use crate::models::account::Account;
use crate::upstream::ShadowdUpstream;
use crate::util::useradd;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::io::Write;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Account to sync (repeatable; defaults to root)
    #[arg(
        short = 'u',
        long = "user",
        value_name = "LOGIN",
        conflicts_with_all = ["all", "pool_all"]
    )]
    pub users: Vec<String>,

    /// Sync every account that already has a hash in the shadow file
    #[arg(long, conflicts_with = "pool_all")]
    pub all: bool,

    /// Sync every account the servers know in the pool
    #[arg(long)]
    pub pool_all: bool,

    /// Also sync SSH authorized keys
    #[arg(long)]
    pub ssh: bool,

    /// Replace authorized_keys instead of merging into it
    #[arg(long, requires = "ssh")]
    pub keys_overwrite: bool,

    /// Create missing local accounts with useradd
    #[arg(long, conflicts_with = "append_missing")]
    pub create_missing: bool,

    /// Append records for accounts missing from the shadow file
    #[arg(long)]
    pub append_missing: bool,

    /// Skip accounts no server knows instead of failing
    #[arg(long)]
    pub update_existing_only: bool,

    /// Print the resulting shadow file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(ctx: &CliContext, args: SyncArgs) -> Result<()> {
    let upstream = ctx.upstream()?;
    let names = target_names(ctx, &upstream, &args)?;
    if names.is_empty() {
        println!("No accounts to sync");
        return Ok(());
    }
    let accounts: Vec<Account> = names
        .iter()
        .map(|name| Account::new(name.as_str(), ctx.pool()))
        .collect();

    let absent = if args.update_existing_only || args.all {
        Absent::Skip
    } else {
        Absent::Fail
    };
    let shadows = sync::fetch_shadows(&upstream, &accounts, absent)?;

    let mut table = ShadowFile::load(&ctx.shadow_path)?;
    if args.create_missing && !args.dry_run {
        let mut created = false;
        for shadow in &shadows {
            if !table.contains(&shadow.username) {
                useradd::create_user(&shadow.username)?;
                created = true;
            }
        }
        if created {
            table = ShadowFile::load(&ctx.shadow_path)?;
        }
    }

    let missing = if args.append_missing {
        Missing::Append
    } else {
        Missing::Reject
    };
    let report = sync::apply_shadows(&mut table, &shadows, missing)?;

    if args.dry_run {
        let mut stdout = std::io::stdout().lock();
        table.write_to(&mut stdout).context("write to stdout")?;
        stdout.flush().context("flush stdout")?;
    } else {
        table.persist()?;
        println!(
            "Updated {} and appended {} entries in {}",
            report.updated,
            report.appended,
            ctx.shadow_path.display()
        );
    }

    if args.ssh {
        sync_keys(ctx, &upstream, &accounts, &args)?;
    }
    Ok(())
}

fn target_names(
    ctx: &CliContext,
    upstream: &ShadowdUpstream,
    args: &SyncArgs,
) -> Result<Vec<String>> {
    if args.pool_all {
        let Some(pool) = ctx.pool() else {
            bail!("--pool-all requires --pool");
        };
        return Ok(sync::pool_accounts(upstream, pool)?);
    }
    if args.all {
        let table = ShadowFile::load(&ctx.shadow_path)?;
        return Ok(table.accounts_with_hashes());
    }
    if args.users.is_empty() {
        return Ok(vec!["root".to_string()]);
    }
    Ok(args.users.clone())
}

/// Failures for single accounts are logged; only losing every host aborts.
fn sync_keys(
    ctx: &CliContext,
    upstream: &ShadowdUpstream,
    accounts: &[Account],
    args: &SyncArgs,
) -> Result<()> {
    let users = passwd_file::load(&ctx.passwd_path)?;
    let keys = sync::fetch_authorized_keys(upstream, accounts)?;

    for (name, account_keys) in &keys {
        let Some(entry) = users.get(name) else {
            error!(
                "can't find home directory for user {} in {}",
                name,
                ctx.passwd_path.display()
            );
            continue;
        };
        let path = entry.authorized_keys_path();
        if args.dry_run {
            println!("Would write {} keys to {}", account_keys.len(), path.display());
            continue;
        }
        match sync::install_keys(
            &path,
            account_keys,
            args.keys_overwrite,
            Some((entry.uid, entry.gid)),
        ) {
            Ok(report) => {
                info!(
                    added = report.added,
                    present = report.present,
                    "keys for {} written",
                    name
                );
                println!(
                    "{}: {} new, {} already present in {}",
                    name,
                    report.added,
                    report.present,
                    path.display()
                );
            }
            Err(err) => error!("can't write ssh keys for {}: {:#}", name, err),
        }
    }
    Ok(())
}
