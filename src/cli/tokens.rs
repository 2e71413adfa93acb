use crate::cli::CliContext;
use crate::models::account;
use crate::upstream::retrieve;
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Base path to enumerate (defaults to the pool)
    pub base: Option<String>,

    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Serialize)]
struct TokenItem {
    token: String,
    user: String,
}

pub fn run(ctx: &CliContext, args: TokensArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }
    let Some(base) = args.base.as_deref().or(ctx.pool()) else {
        bail!("tokens requires a base path or --pool");
    };

    let upstream = ctx.upstream()?;
    let subject = format!("tokens under {}", base);
    let tokens = upstream.resolve(&subject, |host| retrieve::get_tokens(host, base))?;
    let items = items(base, &tokens);

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize tokens")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        println!("No tokens found under {}", base);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Token").add_attribute(Attribute::Bold),
        Cell::new("User").add_attribute(Attribute::Bold),
    ]);
    for item in items {
        table.add_row(vec![item.token, item.user]);
    }
    println!("{}", table);
    Ok(())
}

fn items(base: &str, tokens: &[String]) -> Vec<TokenItem> {
    let base = base.trim_end_matches('/');
    tokens
        .iter()
        .map(|token| TokenItem {
            token: token.clone(),
            user: account::name_from_token(Some(base), token)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}
