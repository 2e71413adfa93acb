use crate::cli::CliContext;
use crate::core::sync;
use crate::models::account::Account;
use crate::util::privilege;
use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Password;
use std::io::BufRead;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct PasswdArgs {
    /// Account to change (defaults to the current user)
    #[arg(short = 'u', long = "user", value_name = "LOGIN")]
    pub user: Option<String>,

    /// Read old and new password from the first two lines of stdin
    #[arg(long)]
    pub from_stdin: bool,
}

pub fn run(ctx: &CliContext, args: PasswdArgs) -> Result<()> {
    if ctx.non_interactive && !args.from_stdin {
        bail!("--non-interactive requires --from-stdin for passwd");
    }

    let name = match args.user {
        Some(user) => user,
        None => privilege::current_user()?,
    };
    let account = Account::new(name, ctx.pool());
    let upstream = ctx.upstream()?;

    let (old, new) = if args.from_stdin {
        read_passwords(std::io::stdin().lock())?
    } else {
        prompt_passwords(&account)?
    };

    sync::change_password(&upstream, &account, &old, &new)
        .with_context(|| format!("change password for {}", account))?;

    println!("Password changed for {}", account);
    Ok(())
}

fn prompt_passwords(account: &Account) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    let old = Zeroizing::new(
        Password::new()
            .with_prompt(format!("Current password for {}", account))
            .interact()
            .context("read current password")?,
    );
    let new = Zeroizing::new(
        Password::new()
            .with_prompt("New password")
            .with_confirmation("Repeat new password", "Passwords do not match")
            .allow_empty_password(false)
            .interact()
            .context("read new password")?,
    );
    Ok((old, new))
}

fn read_passwords<R: BufRead>(input: R) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    let mut lines = input.lines();
    let mut next = |what: &str| -> Result<Zeroizing<String>> {
        match lines.next() {
            Some(line) => Ok(Zeroizing::new(
                line.with_context(|| format!("read {} from stdin", what))?,
            )),
            None => bail!("missing {} on stdin", what),
        }
    };
    let old = next("current password")?;
    let new = next("new password")?;
    if new.is_empty() {
        bail!("new password is empty");
    }
    Ok((old, new))
}
