//! XapiSession: ssh-backed terminal-mode xAPI transport.
//!
//! One driver task owns the subprocess pipes. Requests are serialized through
//! a channel: the driver writes the request line, then collects output until
//! the `** end` terminator. Between requests it keeps reading the stream and
//! forwards unsolicited status lines as feedback events. Feedback that lands
//! inside a response window is folded into that response and not routed;
//! the next device event re-triggers and every pass re-reads full state.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use autoshare_core::{AlertConfig, SourceId};

use crate::client::XapiClient;
use crate::error::XapiError;
use crate::parse::{self, StatusLine, feedback_event};
use crate::types::{ConnectorStatus, FeedbackEvent};

/// Upper bound on one request/response round trip.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Status paths the reconciler needs change notifications for.
const FEEDBACK_PATHS: &[&str] = &[
    "/Status/Conference/Presentation/LocalInstance",
    "/Status/Video/Input/Connector/SignalState",
];

struct Request {
    line: String,
    reply: oneshot::Sender<Result<Response, XapiError>>,
}

struct Response {
    lines: Vec<StatusLine>,
    raw: String,
}

/// Handle to a live xAPI terminal session.
pub struct XapiSession {
    cmd_tx: mpsc::Sender<Request>,
}

impl XapiSession {
    /// Spawn `ssh <host>` to the device's admin shell and start the driver
    /// task. Returns the session handle and the feedback event receiver.
    pub fn connect(host: &str) -> Result<(Self, mpsc::Receiver<FeedbackEvent>), XapiError> {
        let mut command = Command::new("ssh");
        command.arg("-T").arg(host);
        Self::connect_with(command)
    }

    /// Start a session over an arbitrary command speaking the xAPI line
    /// protocol on its stdio. `connect` wraps this around ssh.
    pub fn connect_with(
        mut command: Command,
    ) -> Result<(Self, mpsc::Receiver<FeedbackEvent>), XapiError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or(XapiError::SessionClosed)?;
        let stdout = child.stdout.take().ok_or(XapiError::SessionClosed)?;

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (fb_tx, fb_rx) = mpsc::channel(64);
        tokio::spawn(drive(child, stdin, stdout, cmd_rx, fb_tx));

        Ok((Self { cmd_tx }, fb_rx))
    }

    /// Register feedback for presentation and connector signal changes.
    pub async fn register_feedback(&self) -> Result<(), XapiError> {
        for path in FEEDBACK_PATHS {
            self.request(&format!("xfeedback register {path}")).await?;
        }
        Ok(())
    }

    async fn request(&self, line: &str) -> Result<Response, XapiError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = Request {
            line: line.to_string(),
            reply: reply_tx,
        };
        self.cmd_tx
            .send(request)
            .await
            .map_err(|_| XapiError::SessionClosed)?;
        reply_rx.await.map_err(|_| XapiError::SessionClosed)?
    }

    async fn command(&self, line: &str) -> Result<(), XapiError> {
        let response = self.request(line).await?;
        command_status(&response)
    }
}

impl XapiClient for XapiSession {
    async fn presentation_sources(&self) -> Result<Vec<SourceId>, XapiError> {
        let response = self
            .request("xstatus Conference Presentation LocalInstance")
            .await?;
        Ok(response
            .lines
            .iter()
            .filter_map(|line| match line {
                StatusLine::PresentationSource { source } => Some(*source),
                _ => None,
            })
            .collect())
    }

    async fn connectors(&self) -> Result<Vec<ConnectorStatus>, XapiError> {
        let response = self.request("xstatus Video Input Connector").await?;
        Ok(response
            .lines
            .iter()
            .filter_map(|line| match line {
                StatusLine::SignalState {
                    connector,
                    state: Some(state),
                } => Some(ConnectorStatus {
                    id: *connector,
                    signal_state: state.clone(),
                }),
                _ => None,
            })
            .collect())
    }

    async fn presentation_stop(&self, source: SourceId) -> Result<(), XapiError> {
        self.command(&format!(
            "xcommand Presentation Stop PresentationSource: {source}"
        ))
        .await
    }

    async fn presentation_start(&self, source: SourceId) -> Result<(), XapiError> {
        self.command(&format!(
            "xcommand Presentation Start PresentationSource: {source}"
        ))
        .await
    }

    async fn alert_display(&self, alert: &AlertConfig) -> Result<(), XapiError> {
        self.command(&format!(
            "xcommand UserInterface Message Alert Display Duration: {} Title: {} Text: {}",
            alert.duration_secs,
            quoted(&alert.title),
            quoted(&alert.text),
        ))
        .await
    }

    async fn standby_halfwake(&self) -> Result<(), XapiError> {
        self.command("xcommand Standby Halfwake").await
    }

    async fn uptime_secs(&self) -> Result<u64, XapiError> {
        let response = self.request("xstatus SystemUnit Uptime").await?;
        parse::require_uptime(&response.lines, &response.raw)
    }
}

// ─── Driver Task ──────────────────────────────────────────────────

async fn drive(
    mut child: Child,
    mut stdin: ChildStdin,
    stdout: ChildStdout,
    mut cmd_rx: mpsc::Receiver<Request>,
    fb_tx: mpsc::Sender<FeedbackEvent>,
) {
    let mut lines = BufReader::new(stdout).lines();

    enum Wakeup {
        Request(Request),
        Line(std::io::Result<Option<String>>),
    }

    loop {
        // Classify the wakeup first; the select branches must not hold the
        // line reader while a request round trip needs it.
        let wakeup = tokio::select! {
            request = cmd_rx.recv() => match request {
                Some(request) => Wakeup::Request(request),
                None => break,
            },
            line = lines.next_line() => Wakeup::Line(line),
        };

        match wakeup {
            Wakeup::Request(request) => {
                let result = roundtrip(&mut stdin, &mut lines, &request.line).await;
                // A timed-out response eventually arrives anyway and would be
                // attributed to the next request, shifting every later round
                // trip by one. The stream cannot be trusted past this point;
                // tear the session down so callers see SessionClosed.
                let fatal = matches!(
                    result,
                    Err(XapiError::SessionClosed | XapiError::Timeout)
                );
                let _ = request.reply.send(result);
                if fatal {
                    tracing::warn!("xapi session unrecoverable, closing");
                    break;
                }
            }
            Wakeup::Line(Ok(Some(line))) => {
                if let Some(event) = feedback_event(&line) {
                    tracing::debug!(?event, "device feedback");
                    if fb_tx.try_send(event).is_err() {
                        // Dropping is safe: triggers coalesce and passes
                        // re-read full state.
                        tracing::warn!("feedback channel full, dropping event");
                    }
                }
            }
            Wakeup::Line(Ok(None)) | Wakeup::Line(Err(_)) => {
                tracing::warn!("xapi stream closed");
                break;
            }
        }
    }

    let _ = child.kill().await;
}

async fn roundtrip(
    stdin: &mut ChildStdin,
    lines: &mut Lines<BufReader<ChildStdout>>,
    request: &str,
) -> Result<Response, XapiError> {
    stdin.write_all(request.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;

    let mut parsed = Vec::new();
    let mut raw = String::new();

    let collect = async {
        loop {
            let Some(line) = lines.next_line().await? else {
                return Err(XapiError::SessionClosed);
            };
            match parse::parse_line(&line) {
                StatusLine::End => return Ok(()),
                status => parsed.push(status),
            }
            raw.push_str(&line);
            raw.push('\n');
        }
    };

    match timeout(RESPONSE_TIMEOUT, collect).await {
        Ok(Ok(())) => Ok(Response {
            lines: parsed,
            raw,
        }),
        Ok(Err(error)) => Err(error),
        Err(_) => Err(XapiError::Timeout),
    }
}

fn command_status(response: &Response) -> Result<(), XapiError> {
    let mut saw_result = false;
    let mut failed = false;
    let mut reason = None;

    for line in &response.lines {
        match line {
            StatusLine::CommandResult { ok } => {
                saw_result = true;
                if !ok {
                    failed = true;
                }
            }
            StatusLine::ResultReason(text) => reason = Some(text.clone()),
            _ => {}
        }
    }

    if failed {
        return Err(XapiError::CommandFailed(
            reason.unwrap_or_else(|| "status=Error".to_string()),
        ));
    }
    if !saw_result {
        return Err(XapiError::CommandFailed(
            "no command result in response".to_string(),
        ));
    }
    Ok(())
}

/// Alert text goes on the wire inside double quotes; embedded quotes and
/// backslashes are escaped so the configured text arrives verbatim.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
