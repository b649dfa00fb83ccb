//! autoshare-core: pure reconciliation logic.
//! Decides what the device's presentation state should be; no IO, no timers.
//! The runtime crate owns event plumbing and command execution.

pub mod config;
pub mod plan;
pub mod types;

pub use config::{AlertConfig, Config};
pub use plan::{ReconcilePlan, StateSnapshot, plan};
pub use types::SourceId;
