//! autoshare: priority presentation reconciler binary.
//! Keeps at most one configured presentation source active on a RoomOS-style
//! device, driven by debounced hardware signal/state feedback.

use anyhow::Context;
use clap::Parser;

mod cli;
mod cmd_check;
mod collect;
mod config_file;
mod daemon;
mod debounce;
mod effects;
mod reconcile;
mod router;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let config = config_file::load_config(&args.config)?;
    let host = args
        .host
        .context("device address required (--host or AUTOSHARE_HOST)")?;

    match args.command {
        cli::Command::Daemon(opts) => {
            let filter = std::env::var("AUTOSHARE_LOG")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string());
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
                .init();

            tracing::info!("autoshare daemon starting");
            daemon::run_daemon(&host, config, opts).await?;
        }
        cli::Command::Check => {
            cmd_check::cmd_check(&host, &config).await?;
        }
    }

    Ok(())
}
