//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "autoshare", about = "priority presentation reconciler")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "autoshare.toml")]
    pub config: String,

    /// Device address for the ssh xAPI session (user@host)
    #[arg(long, global = true, env = "AUTOSHARE_HOST")]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the reconciler daemon (feedback subscription + debounced passes)
    Daemon(DaemonOpts),
    /// One-shot dry run: read device state, print the plan, change nothing
    Check,
}

#[derive(clap::Args)]
pub struct DaemonOpts {
    /// Debounce quiet period in milliseconds
    #[arg(long, default_value = "2000")]
    pub quiet_ms: u64,

    /// Settle delay between device commands in milliseconds
    #[arg(long, default_value = "200")]
    pub settle_ms: u64,

    /// Minimum device uptime before acting, in seconds
    #[arg(long, default_value = "60")]
    pub min_uptime_secs: u64,
}
