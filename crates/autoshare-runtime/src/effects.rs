//! Side-effect executor: turns a plan into an ordered device command
//! sequence with settle delays between dependent commands.

use std::time::Duration;

use autoshare_core::{Config, ReconcilePlan};
use autoshare_xapi::{XapiClient, XapiError};
use tokio::time;

/// Execute a plan against the device.
///
/// Stops are issued strictly one at a time, each followed by the settle
/// delay, so the device's command queue is never flooded. Every stop for a
/// pass completes before the start is issued. Any command failure aborts the
/// remainder of the sequence for this pass — a failed stop must not be
/// followed by a start while teardown is in an unknown state.
pub async fn execute<C: XapiClient>(
    client: &C,
    config: &Config,
    plan: &ReconcilePlan,
    settle: Duration,
) -> Result<(), XapiError> {
    match plan {
        ReconcilePlan::Idle => Ok(()),
        ReconcilePlan::Halfwake => {
            tracing::info!("no eligible source signaled, entering halfwake");
            client.standby_halfwake().await
        }
        ReconcilePlan::Switch {
            stops,
            alert,
            start,
        } => {
            for source in stops {
                tracing::info!(%source, "stopping presentation");
                client.presentation_stop(*source).await?;
                time::sleep(settle).await;
            }

            if *alert {
                client.alert_display(&config.alert).await?;
            }

            if let Some(source) = start {
                time::sleep(settle).await;
                tracing::info!(%source, "starting presentation");
                client.presentation_start(*source).await?;
            }

            Ok(())
        }
    }
}
