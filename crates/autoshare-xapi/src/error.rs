//! Error types for the xAPI backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XapiError {
    #[error("xapi command failed: {0}")]
    CommandFailed(String),

    #[error("failed to parse xapi line {line:?}: {detail}")]
    Parse { line: String, detail: String },

    #[error("xapi session closed")]
    SessionClosed,

    #[error("timed out waiting for xapi response")]
    Timeout,

    #[error("xapi io error: {0}")]
    Io(#[from] std::io::Error),
}
