//! Reconcile planner: decides which presentation source should be active.
//!
//! Pure decision logic:
//!
//! - **Validity**: no configured source signaled → half-wake (when enabled).
//! - **Target selection**: first configured source with a signal wins; ties
//!   break strictly by configured order, never by arrival time.
//! - **Redundancy**: every other active presentation is torn down.
//! - **Idempotence**: an already-active required source is never restarted.
//!
//! Every pass recomputes from a fresh snapshot; nothing persists between
//! passes, so the algorithm is self-correcting against missed events.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::Config;
use crate::types::SourceId;

/// Device state read at the start of a reconciliation pass.
///
/// Both sets are collected together, within the same pass, so the planner
/// never acts on a stale combination. `BTreeSet` fixes the teardown order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    /// Sources currently presenting on the device.
    pub active: BTreeSet<SourceId>,
    /// Connectors currently reporting a valid signal.
    pub signaled: BTreeSet<SourceId>,
}

/// Terminal outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilePlan {
    /// No configured source is signaled; drop the device into half-wake.
    Halfwake,
    /// Nothing to do: state already correct, or no eligible source and the
    /// half-wake fallback is disabled.
    Idle,
    /// Stop the redundant sources (in order), optionally alert once, then
    /// start the required source unless it is already presenting.
    Switch {
        /// Redundant sources to stop, ascending id order.
        stops: Vec<SourceId>,
        /// Show the configured alert after teardown.
        alert: bool,
        /// Source to start, `None` when the required source already presents.
        start: Option<SourceId>,
    },
}

impl ReconcilePlan {
    /// True when the pass issues no device commands.
    pub fn is_noop(&self) -> bool {
        matches!(self, ReconcilePlan::Idle)
    }
}

impl fmt::Display for ReconcilePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcilePlan::Halfwake => write!(f, "halfwake"),
            ReconcilePlan::Idle => write!(f, "idle"),
            ReconcilePlan::Switch {
                stops,
                alert,
                start,
            } => {
                write!(f, "switch: stop [")?;
                for (i, id) in stops.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}")?;
                }
                write!(f, "]")?;
                if *alert {
                    write!(f, ", alert")?;
                }
                match start {
                    Some(id) => write!(f, ", start {id}"),
                    None => write!(f, ", start none (already presenting)"),
                }
            }
        }
    }
}

/// Compute the plan for one reconciliation pass.
///
/// Deterministic: the same configuration and snapshot always produce the same
/// plan. An empty priority order is not an error — it never finds a required
/// source, so it falls through to half-wake or idle.
pub fn plan(config: &Config, snapshot: &StateSnapshot) -> ReconcilePlan {
    let required = config
        .priority_order
        .iter()
        .copied()
        .find(|source| snapshot.signaled.contains(source));

    let Some(required) = required else {
        // No configured source carries a signal.
        if config.no_signal_halfwake {
            return ReconcilePlan::Halfwake;
        }
        return ReconcilePlan::Idle;
    };

    // Everything presenting that is not the required source is redundant,
    // including sources outside the priority order entirely.
    let stops: Vec<SourceId> = snapshot
        .active
        .iter()
        .copied()
        .filter(|source| *source != required)
        .collect();

    // Restarting an already-active source would cause visible flicker.
    let start = (!snapshot.active.contains(&required)).then_some(required);

    if stops.is_empty() && start.is_none() {
        return ReconcilePlan::Idle;
    }

    ReconcilePlan::Switch {
        alert: !stops.is_empty() && config.alert.enabled,
        stops,
        start,
    }
}
