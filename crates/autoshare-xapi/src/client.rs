//! XapiClient trait: the device status/command boundary.
//! Enables mock injection for testing; the real transport is `XapiSession`.

use autoshare_core::{AlertConfig, SourceId};

use crate::error::XapiError;
use crate::types::ConnectorStatus;

/// Device status/command API as consumed by the reconciler.
///
/// All methods are single round-trips. Queries are read-only and idempotent;
/// commands must be awaited before issuing the next dependent command.
#[allow(async_fn_in_trait)]
pub trait XapiClient: Send + Sync {
    /// Source identifiers of the active local presentation instances, one
    /// entry per instance.
    async fn presentation_sources(&self) -> Result<Vec<SourceId>, XapiError>;

    /// All video input connectors with their current signal state.
    async fn connectors(&self) -> Result<Vec<ConnectorStatus>, XapiError>;

    /// Stop the presentation on the given source.
    async fn presentation_stop(&self, source: SourceId) -> Result<(), XapiError>;

    /// Start presenting the given source.
    async fn presentation_start(&self, source: SourceId) -> Result<(), XapiError>;

    /// Display a user-facing alert on the device.
    async fn alert_display(&self, alert: &AlertConfig) -> Result<(), XapiError>;

    /// Put the device into the reduced-power half-wake state.
    async fn standby_halfwake(&self) -> Result<(), XapiError>;

    /// Seconds since device boot.
    async fn uptime_secs(&self) -> Result<u64, XapiError>;
}
