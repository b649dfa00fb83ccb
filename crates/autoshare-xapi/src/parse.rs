// Terminal-mode xAPI output parser.
//
// The device's admin shell answers `xstatus`/`xcommand` requests with line
// output and terminates each response with `** end`. Status lines carry a
// `*s` prefix, command results a `*r` prefix. Registered feedback arrives as
// unsolicited `*s` lines on the same stream. This module provides:
//
// - `StatusLine` enum for parsed line types
// - `parse_line()` for a single output line
// - `feedback_event()` for classifying unsolicited lines

use autoshare_core::SourceId;

use crate::error::XapiError;
use crate::types::{FeedbackEvent, SignalState};

/// Parsed xAPI output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// `*s Conference Presentation LocalInstance <n> Source: <id>`
    PresentationSource { source: SourceId },

    /// Any other presentation-instance status line (SendingMode, ghost
    /// markers on teardown, …). Relevant only as a change notification.
    PresentationOther,

    /// `*s Video Input Connector <id> SignalState: <value>`
    /// `state` is `None` when the device reports an empty value.
    SignalState {
        connector: SourceId,
        state: Option<SignalState>,
    },

    /// `*s SystemUnit Uptime: <secs>`
    Uptime(u64),

    /// `*r <Command>Result (status=OK|Error):`
    CommandResult { ok: bool },

    /// `*r <Command>Result Reason: <text>` — follows a failed result.
    ResultReason(String),

    /// `** end` — response terminator.
    End,

    /// Anything else: echo, prompts, blank lines, unrecognized paths.
    Other,
}

/// Parse a single line of xAPI output. Unrecognized lines fold into
/// `StatusLine::Other` rather than failing; the stream stays live.
pub fn parse_line(line: &str) -> StatusLine {
    let line = line.trim_end_matches(['\r', '\n']).trim();
    if line.is_empty() {
        return StatusLine::Other;
    }

    if line == "** end" {
        return StatusLine::End;
    }

    if let Some(rest) = line.strip_prefix("*r ") {
        return parse_result_line(rest);
    }

    if let Some(rest) = line.strip_prefix("*s ") {
        return parse_status_line(rest);
    }

    StatusLine::Other
}

fn parse_result_line(rest: &str) -> StatusLine {
    if rest.contains("(status=OK)") {
        return StatusLine::CommandResult { ok: true };
    }
    if rest.contains("(status=Error)") {
        return StatusLine::CommandResult { ok: false };
    }
    if let Some((_, reason)) = rest.split_once("Reason: ") {
        return StatusLine::ResultReason(unquote(reason).to_string());
    }
    StatusLine::Other
}

fn parse_status_line(rest: &str) -> StatusLine {
    if let Some(tail) = rest.strip_prefix("Conference Presentation LocalInstance ") {
        let mut parts = tail.split_whitespace();
        let instance_ok = parts
            .next()
            .map(|n| n.parse::<u32>().is_ok())
            .unwrap_or(false);
        if !instance_ok {
            return StatusLine::PresentationOther;
        }
        if parts.next() == Some("Source:") {
            if let Some(source) = parts.next().and_then(|n| n.parse::<SourceId>().ok()) {
                return StatusLine::PresentationSource { source };
            }
        }
        return StatusLine::PresentationOther;
    }

    if let Some(tail) = rest.strip_prefix("Video Input Connector ") {
        let mut parts = tail.split_whitespace();
        let Some(connector) = parts.next().and_then(|n| n.parse::<SourceId>().ok()) else {
            return StatusLine::Other;
        };
        if parts.next() == Some("SignalState:") {
            let state = match parts.next() {
                None | Some("\"\"") => None,
                Some(value) => Some(SignalState::parse(unquote(value))),
            };
            return StatusLine::SignalState { connector, state };
        }
        return StatusLine::Other;
    }

    if let Some(value) = rest.strip_prefix("SystemUnit Uptime: ") {
        if let Ok(secs) = unquote(value).trim().parse::<u64>() {
            return StatusLine::Uptime(secs);
        }
    }

    StatusLine::Other
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Classify an unsolicited line into a feedback event, if it is one.
pub fn feedback_event(line: &str) -> Option<FeedbackEvent> {
    match parse_line(line) {
        StatusLine::PresentationSource { .. } | StatusLine::PresentationOther => {
            Some(FeedbackEvent::PresentationChanged)
        }
        StatusLine::SignalState { connector, state } => {
            Some(FeedbackEvent::SignalStateChanged { connector, state })
        }
        _ => None,
    }
}

/// Extract the uptime value from a full response, or a parse error naming
/// what actually came back.
pub fn require_uptime(lines: &[StatusLine], raw: &str) -> Result<u64, XapiError> {
    lines
        .iter()
        .find_map(|line| match line {
            StatusLine::Uptime(secs) => Some(*secs),
            _ => None,
        })
        .ok_or_else(|| XapiError::Parse {
            line: raw.to_string(),
            detail: "no SystemUnit Uptime in response".to_string(),
        })
}
