//! Power-off decision sink.

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

use super::DecisionSink;
use crate::domain::Decision;
use crate::error::{Result, SupervisorError};

/// Default privileged power-off command
pub const DEFAULT_POWER_OFF_COMMAND: &[&str] = &["sudo", "poweroff"];

/// Runs a privileged power-off command on `Decision::Shutdown`.
///
/// Clean exits are a no-op. The command is run once; its failure is reported
/// but never retried.
#[derive(Debug, Clone)]
pub struct PowerOffSink {
    command: Vec<String>,
}

impl PowerOffSink {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    async fn power_off(&self) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(SupervisorError::PowerOff("no power-off command configured".to_string()));
        };

        info!("Powering off with: {}", self.command.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| SupervisorError::PowerOff(format!("{}: {}", program, e)))?;

        if status.success() {
            debug!("Power-off command accepted");
            Ok(())
        } else {
            Err(SupervisorError::PowerOff(format!("{} exited with {}", program, status)))
        }
    }
}

impl Default for PowerOffSink {
    fn default() -> Self {
        Self::new(DEFAULT_POWER_OFF_COMMAND.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl DecisionSink for PowerOffSink {
    async fn publish(&self, decision: Decision) -> Result<()> {
        match decision {
            Decision::Shutdown => self.power_off().await,
            Decision::Exit | Decision::Restart => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("power-off command `{}`", self.command.join(" "))
    }
}
