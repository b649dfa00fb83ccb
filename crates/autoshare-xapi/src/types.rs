use std::fmt;

use autoshare_core::SourceId;

// ─── Signal State ─────────────────────────────────────────────────

/// Signal state reported by a video input connector.
///
/// Only `Ok` counts as a valid signal. `DetectingFormat` is a transient
/// state during format negotiation and must not drive reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalState {
    Ok,
    DetectingFormat,
    NotFound,
    Unstable,
    Unsupported,
    Unknown,
    /// Value this build does not know about; kept verbatim.
    Other(String),
}

impl SignalState {
    /// Parse a device-reported value. Never fails; unknown values land in
    /// `Other` so they still reach the event router unfiltered.
    pub fn parse(value: &str) -> Self {
        match value {
            "OK" => Self::Ok,
            "DetectingFormat" => Self::DetectingFormat,
            "NotFound" => Self::NotFound,
            "Unstable" => Self::Unstable,
            "Unsupported" => Self::Unsupported,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::DetectingFormat => "DetectingFormat",
            Self::NotFound => "NotFound",
            Self::Unstable => "Unstable",
            Self::Unsupported => "Unsupported",
            Self::Unknown => "Unknown",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Status Snapshots ─────────────────────────────────────────────

/// Current signal state of one video input connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorStatus {
    pub id: SourceId,
    pub signal_state: SignalState,
}

// ─── Feedback ─────────────────────────────────────────────────────

/// Asynchronous device notification parsed from an unsolicited status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// The set of local presentation instances changed in some way.
    PresentationChanged,
    /// A connector's signal state changed. `state` is `None` when the device
    /// sent an empty value (connector removed or state cleared).
    SignalStateChanged {
        connector: SourceId,
        state: Option<SignalState>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_state_round_trips_known_values() {
        for value in ["OK", "DetectingFormat", "NotFound", "Unstable"] {
            assert_eq!(SignalState::parse(value).as_str(), value);
        }
    }

    #[test]
    fn unknown_signal_state_preserved() {
        let state = SignalState::parse("SomeFutureState");
        assert_eq!(state, SignalState::Other("SomeFutureState".to_string()));
        assert_eq!(state.as_str(), "SomeFutureState");
    }
}
