//! Daemon assembly: session, boot gate, initial pass, feedback loop.

use std::sync::Arc;
use std::time::Duration;

use autoshare_core::Config;
use autoshare_xapi::XapiSession;

use crate::cli::DaemonOpts;
use crate::debounce::Debouncer;
use crate::reconcile;
use crate::router;

/// Run the reconciler daemon until ctrl-c or SIGTERM.
pub async fn run_daemon(host: &str, config: Config, opts: DaemonOpts) -> anyhow::Result<()> {
    let (session, fb_rx) = XapiSession::connect(host)?;
    let client = Arc::new(session);

    router::wait_for_boot(&*client, opts.min_uptime_secs).await?;

    let config = Arc::new(config);
    let settle = Duration::from_millis(opts.settle_ms);

    // One immediate pass outside the debounce window, so a restart converges
    // without waiting for the next device event.
    if let Err(error) = reconcile::run_pass(&*client, &config, settle).await {
        tracing::warn!(%error, "initial reconcile pass failed");
    }

    client.register_feedback().await?;

    let pass_client = Arc::clone(&client);
    let pass_config = Arc::clone(&config);
    let debouncer = Debouncer::spawn(Duration::from_millis(opts.quiet_ms), move || {
        let client = Arc::clone(&pass_client);
        let config = Arc::clone(&pass_config);
        async move {
            if let Err(error) = reconcile::run_pass(&*client, &config, settle).await {
                tracing::warn!(%error, "reconcile pass failed");
            }
        }
    });

    let router_handle = tokio::spawn(router::route_events(fb_rx, debouncer));

    // Wait for shutdown signal (ctrl-c or SIGTERM)
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {}
        _ = router_handle => {
            tracing::warn!("event router exited unexpectedly");
        }
    }

    tracing::info!("daemon stopped");
    Ok(())
}
