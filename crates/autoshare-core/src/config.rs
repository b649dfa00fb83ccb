//! Static configuration: built once at startup, immutable for the process
//! lifetime, passed by reference into the planner and executor.

use serde::Deserialize;

use crate::types::SourceId;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Presentation sources in priority order, highest first. May name
    /// connectors the hardware does not have; those simply never match.
    pub priority_order: Vec<SourceId>,

    /// Enter half-wake when no configured source carries a signal.
    #[serde(default = "default_true")]
    pub no_signal_halfwake: bool,

    #[serde(default)]
    pub alert: AlertConfig,
}

/// On-screen alert shown when a presentation is preempted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds the alert stays on screen.
    #[serde(default = "default_alert_duration")]
    pub duration_secs: u32,

    #[serde(default = "default_alert_title")]
    pub title: String,

    #[serde(default = "default_alert_text")]
    pub text: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: default_alert_duration(),
            title: default_alert_title(),
            text: default_alert_text(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_alert_duration() -> u32 {
    30
}

fn default_alert_title() -> String {
    "Auto Share".to_string()
}

fn default_alert_text() -> String {
    "Unplug cable to restore previous presentation".to_string()
}
