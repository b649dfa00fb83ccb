//! autoshare-xapi: device IO boundary.
//! Terminal-mode xAPI line parsing, the mock-injectable client trait, and the
//! ssh-backed session transport. No business logic — pure IO boundary.

pub mod client;
pub mod error;
pub mod parse;
pub mod session;
pub mod types;

pub use client::XapiClient;
pub use error::XapiError;
pub use parse::{StatusLine, feedback_event, parse_line};
pub use session::XapiSession;
pub use types::{ConnectorStatus, FeedbackEvent, SignalState};
