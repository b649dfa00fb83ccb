//! Fake xAPI client for runtime tests: scripted state, recorded commands.

use std::collections::HashSet;
use std::sync::Mutex;

use autoshare_core::{AlertConfig, SourceId};
use autoshare_xapi::{ConnectorStatus, SignalState, XapiClient, XapiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Stop(SourceId),
    Start(SourceId),
    Alert,
    Halfwake,
}

#[derive(Default)]
pub struct FakeXapi {
    sources: Vec<SourceId>,
    connectors: Vec<ConnectorStatus>,
    uptime: u64,
    fail_queries: bool,
    fail_stop_on: HashSet<SourceId>,
    pub commands: Mutex<Vec<DeviceCommand>>,
}

impl FakeXapi {
    pub fn new() -> Self {
        Self {
            uptime: 3600,
            ..Self::default()
        }
    }

    pub fn with_active(mut self, source: u32) -> Self {
        self.sources.push(SourceId(source));
        self
    }

    pub fn with_connector(mut self, id: u32, signal_state: SignalState) -> Self {
        self.connectors.push(ConnectorStatus {
            id: SourceId(id),
            signal_state,
        });
        self
    }

    pub fn with_uptime(mut self, uptime: u64) -> Self {
        self.uptime = uptime;
        self
    }

    pub fn with_query_failure(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn failing_stop_on(mut self, source: u32) -> Self {
        self.fail_stop_on.insert(SourceId(source));
        self
    }

    pub fn recorded(&self) -> Vec<DeviceCommand> {
        self.commands.lock().expect("commands lock").clone()
    }

    fn record(&self, command: DeviceCommand) {
        self.commands.lock().expect("commands lock").push(command);
    }
}

impl XapiClient for FakeXapi {
    async fn presentation_sources(&self) -> Result<Vec<SourceId>, XapiError> {
        if self.fail_queries {
            return Err(XapiError::Timeout);
        }
        Ok(self.sources.clone())
    }

    async fn connectors(&self) -> Result<Vec<ConnectorStatus>, XapiError> {
        if self.fail_queries {
            return Err(XapiError::Timeout);
        }
        Ok(self.connectors.clone())
    }

    async fn presentation_stop(&self, source: SourceId) -> Result<(), XapiError> {
        if self.fail_stop_on.contains(&source) {
            return Err(XapiError::CommandFailed(format!("stop {source} refused")));
        }
        self.record(DeviceCommand::Stop(source));
        Ok(())
    }

    async fn presentation_start(&self, source: SourceId) -> Result<(), XapiError> {
        self.record(DeviceCommand::Start(source));
        Ok(())
    }

    async fn alert_display(&self, _alert: &AlertConfig) -> Result<(), XapiError> {
        self.record(DeviceCommand::Alert);
        Ok(())
    }

    async fn standby_halfwake(&self) -> Result<(), XapiError> {
        self.record(DeviceCommand::Halfwake);
        Ok(())
    }

    async fn uptime_secs(&self) -> Result<u64, XapiError> {
        Ok(self.uptime)
    }
}
