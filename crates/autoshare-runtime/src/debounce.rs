//! Trailing-edge debouncer: coalesces bursts of triggers into one action run.
//!
//! A single worker task owns the timer. Each trigger restarts the quiet
//! period; the action runs only once no trigger has arrived for a full quiet
//! period, and is awaited to completion before the next window can open — so
//! action runs never overlap. The trigger channel has capacity 1: any number
//! of triggers during a running action coalesce into exactly one follow-up
//! run, which reads fresh state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

/// Handle for firing triggers. Cheap to clone.
#[derive(Clone)]
pub struct Debouncer {
    tx: mpsc::Sender<()>,
}

impl Debouncer {
    /// Spawn the worker loop bound to `action`.
    pub fn spawn<F, Fut>(quiet: Duration, mut action: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Quiet period restarts on every further trigger.
                loop {
                    tokio::select! {
                        _ = time::sleep(quiet) => break,
                        more = rx.recv() => {
                            if more.is_none() {
                                return;
                            }
                        }
                    }
                }
                action().await;
            }
        });

        Self { tx }
    }

    /// Schedule (or re-schedule) the action after the quiet period.
    /// Never blocks; a full channel means a run is already pending.
    pub fn trigger(&self) {
        let _ = self.tx.try_send(());
    }
}
