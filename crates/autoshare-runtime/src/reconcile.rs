//! Reconcile pass driver: collect → plan → execute.

use std::collections::BTreeSet;
use std::time::Duration;

use autoshare_core::{Config, ReconcilePlan, SourceId, plan};
use autoshare_xapi::{XapiClient, XapiError};

use crate::collect::collect;
use crate::effects::execute;

/// Run one reconciliation pass to completion.
///
/// Errors abort the pass only; the caller keeps running and the next trigger
/// drives a fresh pass against fresh state.
pub async fn run_pass<C: XapiClient>(
    client: &C,
    config: &Config,
    settle: Duration,
) -> Result<ReconcilePlan, XapiError> {
    let snapshot = collect(client).await?;
    let decided = plan(config, &snapshot);

    tracing::info!(
        active = %render_set(&snapshot.active),
        signaled = %render_set(&snapshot.signaled),
        plan = %decided,
        "reconciling presentation state"
    );

    execute(client, config, &decided, settle).await?;
    Ok(decided)
}

pub fn render_set(set: &BTreeSet<SourceId>) -> String {
    let ids: Vec<String> = set.iter().map(SourceId::to_string).collect();
    format!("[{}]", ids.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DeviceCommand, FakeXapi};
    use autoshare_core::AlertConfig;
    use autoshare_xapi::SignalState;

    const SETTLE: Duration = Duration::from_millis(200);

    fn config(order: &[u32]) -> Config {
        Config {
            priority_order: order.iter().copied().map(SourceId).collect(),
            no_signal_halfwake: true,
            alert: AlertConfig::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn preempts_lower_priority_presentation() {
        // Source 3 presents; both 2 and 3 carry signal; 2 outranks 3.
        let client = FakeXapi::new()
            .with_active(3)
            .with_connector(2, SignalState::Ok)
            .with_connector(3, SignalState::Ok);

        run_pass(&client, &config(&[2, 3]), SETTLE)
            .await
            .expect("pass should succeed");

        assert_eq!(
            client.recorded(),
            vec![
                DeviceCommand::Stop(SourceId(3)),
                DeviceCommand::Alert,
                DeviceCommand::Start(SourceId(2)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn correct_state_issues_no_commands() {
        let client = FakeXapi::new()
            .with_active(2)
            .with_connector(2, SignalState::Ok)
            .with_connector(3, SignalState::Ok);

        let decided = run_pass(&client, &config(&[2, 3]), SETTLE)
            .await
            .expect("pass should succeed");

        assert!(decided.is_noop());
        assert!(client.recorded().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_signal_anywhere_enters_halfwake() {
        let client = FakeXapi::new()
            .with_connector(2, SignalState::NotFound)
            .with_connector(3, SignalState::NotFound);

        run_pass(&client, &config(&[2, 3]), SETTLE)
            .await
            .expect("pass should succeed");

        assert_eq!(client.recorded(), vec![DeviceCommand::Halfwake]);
    }

    #[tokio::test(start_paused = true)]
    async fn query_failure_leaves_device_untouched() {
        let client = FakeXapi::new().with_query_failure();

        assert!(run_pass(&client, &config(&[2, 3]), SETTLE).await.is_err());
        assert!(client.recorded().is_empty());
    }

    #[test]
    fn render_set_is_compact() {
        let set: BTreeSet<SourceId> = [SourceId(3), SourceId(2)].into();
        assert_eq!(render_set(&set), "[2, 3]");
    }
}
