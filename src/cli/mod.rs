//! CLI routing and command dispatch.

use crate::constants;
use crate::core::config;
use crate::models::config::ClientConfig;
use crate::upstream::transport::HttpTransport;
use crate::upstream::ShadowdUpstream;
use crate::util::privilege;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

pub mod passwd;
pub mod sync;
pub mod tokens;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub servers: Vec<String>,
    pub pool: Option<String>,
    pub cert: PathBuf,
    pub shadow_path: PathBuf,
    pub passwd_path: PathBuf,
    pub non_interactive: bool,
}

impl CliContext {
    /// Build the upstream pool. Fails before any host is contacted when an
    /// address or the certificate is invalid.
    pub fn upstream(&self) -> Result<ShadowdUpstream> {
        if self.servers.is_empty() {
            bail!("no shadowd servers configured (use --server or servers in the config file)");
        }
        let transport = HttpTransport::with_pinned_cert(&self.cert)?;
        let upstream = ShadowdUpstream::from_addresses(&self.servers, Rc::new(transport))?;
        debug!(servers = ?self.servers, "upstream ready");
        Ok(upstream)
    }

    pub fn pool(&self) -> Option<&str> {
        self.pool.as_deref()
    }
}

#[derive(Parser, Debug)]
#[command(name = "shadowc", version, about = "Shadow hash and SSH key distribution client")]
pub struct Cli {
    /// Client config file
    #[arg(long, global = true, value_name = "PATH", env = "SHADOWC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Shadowd server address (host:port), repeat for failover order
    #[arg(
        short = 's',
        long = "server",
        global = true,
        value_name = "ADDR",
        env = "SHADOWC_SERVERS",
        value_delimiter = ','
    )]
    pub servers: Vec<String>,

    /// Pool to address accounts in
    #[arg(short, long, global = true, env = "SHADOWC_POOL")]
    pub pool: Option<String>,

    /// PEM certificate trusted as the only TLS root
    #[arg(long, global = true, value_name = "PATH", env = "SHADOWC_CERT")]
    pub cert: Option<PathBuf>,

    /// Shadow file to update
    #[arg(long, global = true, value_name = "PATH")]
    pub shadow: Option<PathBuf>,

    /// Passwd file used to locate home directories
    #[arg(long, global = true, value_name = "PATH")]
    pub passwd: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "SHADOWC_NON_INTERACTIVE")]
    pub non_interactive: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_CONFIG_PATH));
        let file = config::load(&config_path)?;
        let ctx = self.context(file);

        if self.command.requires_root(&ctx) {
            privilege::require_root(self.command.name())?;
        }

        match self.command {
            Commands::Sync(args) => sync::run(&ctx, args),
            Commands::Passwd(args) => passwd::run(&ctx, args),
            Commands::Tokens(args) => tokens::run(&ctx, args),
        }
    }

    /// Command-line values override the config file.
    fn context(&self, file: ClientConfig) -> CliContext {
        let servers = if self.servers.is_empty() {
            file.servers
        } else {
            self.servers.clone()
        };
        CliContext {
            servers,
            pool: self.pool.clone().or(file.pool).filter(|p| !p.is_empty()),
            cert: self.cert.clone().unwrap_or(file.cert),
            shadow_path: self.shadow.clone().unwrap_or(file.shadow_path),
            passwd_path: self.passwd.clone().unwrap_or(file.passwd_path),
            non_interactive: self.non_interactive,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch hashes (and optionally SSH keys) and apply them locally
    Sync(sync::SyncArgs),
    /// Change an account password on the servers
    Passwd(passwd::PasswdArgs),
    /// List account tokens known under a pool
    Tokens(tokens::TokensArgs),
}

impl Commands {
    /// Whether this command requires root privileges.
    pub fn requires_root(&self, ctx: &CliContext) -> bool {
        match self {
            Commands::Sync(args) => {
                !args.dry_run
                    && (ctx.shadow_path == PathBuf::from(constants::DEFAULT_SHADOW_PATH)
                        || args.ssh
                        || args.create_missing)
            }
            Commands::Passwd(_) | Commands::Tokens(_) => false,
        }
    }

    /// Command name for error messages.
    pub fn name(&self) -> &str {
        match self {
            Commands::Sync(_) => "sync",
            Commands::Passwd(_) => "passwd",
            Commands::Tokens(_) => "tokens",
        }
    }
}
