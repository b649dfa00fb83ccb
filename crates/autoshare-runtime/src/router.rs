//! Event router: filters device feedback and feeds the debouncer.

use std::time::Duration;

use autoshare_xapi::{FeedbackEvent, SignalState, XapiClient, XapiError};
use tokio::sync::mpsc;
use tokio::time;

use crate::debounce::Debouncer;

/// Decide whether a feedback event warrants a reconciliation.
///
/// Presentation changes always do. Connector events are noisy: empty payloads
/// and the transient `DetectingFormat` negotiation state are dropped so a
/// cable being plugged in does not cause a premature pass.
pub fn should_trigger(event: &FeedbackEvent) -> bool {
    match event {
        FeedbackEvent::PresentationChanged => true,
        FeedbackEvent::SignalStateChanged { state: None, .. } => false,
        FeedbackEvent::SignalStateChanged {
            state: Some(SignalState::DetectingFormat),
            ..
        } => false,
        FeedbackEvent::SignalStateChanged { .. } => true,
    }
}

/// Steady-state loop: forward relevant feedback to the debouncer.
/// Returns when the feedback stream closes.
pub async fn route_events(mut rx: mpsc::Receiver<FeedbackEvent>, debouncer: Debouncer) {
    while let Some(event) = rx.recv().await {
        if should_trigger(&event) {
            tracing::debug!(?event, "scheduling reconciliation");
            debouncer.trigger();
        } else {
            tracing::trace!(?event, "ignoring transient feedback");
        }
    }
    tracing::warn!("feedback stream ended");
}

/// Hold off until the device has been up for `min_uptime_secs`, so boot-time
/// signal flapping never drives source changes.
pub async fn wait_for_boot<C: XapiClient>(
    client: &C,
    min_uptime_secs: u64,
) -> Result<(), XapiError> {
    let uptime = client.uptime_secs().await?;
    if uptime < min_uptime_secs {
        let wait = min_uptime_secs - uptime;
        tracing::info!(uptime, wait, "device recently booted, delaying startup");
        time::sleep(Duration::from_secs(wait)).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeXapi;
    use autoshare_core::SourceId;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn signal(state: Option<SignalState>) -> FeedbackEvent {
        FeedbackEvent::SignalStateChanged {
            connector: SourceId(2),
            state,
        }
    }

    #[test]
    fn presentation_changes_always_trigger() {
        assert!(should_trigger(&FeedbackEvent::PresentationChanged));
    }

    #[test]
    fn detecting_format_never_triggers() {
        assert!(!should_trigger(&signal(Some(SignalState::DetectingFormat))));
    }

    #[test]
    fn empty_payload_never_triggers() {
        assert!(!should_trigger(&signal(None)));
    }

    #[test]
    fn other_signal_states_trigger() {
        assert!(should_trigger(&signal(Some(SignalState::Ok))));
        assert!(should_trigger(&signal(Some(SignalState::NotFound))));
        assert!(should_trigger(&signal(Some(SignalState::Other(
            "SomeFutureState".to_string()
        )))));
    }

    #[tokio::test(start_paused = true)]
    async fn detecting_format_alone_schedules_no_pass() {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&runs);
        let debouncer = Debouncer::spawn(Duration::from_millis(100), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(route_events(rx, debouncer));

        tx.send(signal(Some(SignalState::DetectingFormat)))
            .await
            .expect("send");
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        // The follow-up OK event does schedule one.
        tx.send(signal(Some(SignalState::Ok))).await.expect("send");
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn boot_gate_waits_out_remaining_uptime() {
        let client = FakeXapi::new().with_uptime(45);
        let began = time::Instant::now();

        wait_for_boot(&client, 60).await.expect("gate should pass");

        assert_eq!(began.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn boot_gate_passes_immediately_on_long_uptime() {
        let client = FakeXapi::new().with_uptime(3600);
        let began = time::Instant::now();

        wait_for_boot(&client, 60).await.expect("gate should pass");

        assert_eq!(began.elapsed(), Duration::ZERO);
    }
}
