//! Signal collector: reads device state for one reconciliation pass.

use autoshare_core::StateSnapshot;
use autoshare_xapi::{SignalState, XapiClient, XapiError};

/// Query both sets the planner needs, within the same pass. A failure of
/// either query aborts the pass; nothing is cached between passes.
pub async fn collect<C: XapiClient>(client: &C) -> Result<StateSnapshot, XapiError> {
    let sources = client.presentation_sources().await?;
    let connectors = client.connectors().await?;

    let active = sources.into_iter().collect();
    let signaled = connectors
        .iter()
        .filter(|connector| connector.signal_state == SignalState::Ok)
        .map(|connector| connector.id)
        .collect();

    Ok(StateSnapshot { active, signaled })
}
