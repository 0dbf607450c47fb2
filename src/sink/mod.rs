//! Decision sinks.
//!
//! Where a terminal decision goes once the loop stops: either straight to a
//! privileged power-off command, or into a flag file an outer launcher reads.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ShutdownConfig, ShutdownMode};
use crate::domain::Decision;
use crate::error::Result;

mod flag_file;
mod power_off;

pub use flag_file::FlagFileSink;
pub use power_off::{DEFAULT_POWER_OFF_COMMAND, PowerOffSink};

/// Receives the supervisor's terminal decision.
#[async_trait]
pub trait DecisionSink: Send + Sync {
    /// Act on `decision`. Called once, when the loop stops.
    async fn publish(&self, decision: Decision) -> Result<()>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Build the sink selected by the shutdown config.
pub fn from_config(config: &ShutdownConfig) -> Arc<dyn DecisionSink> {
    match config.mode {
        ShutdownMode::PowerOff => Arc::new(PowerOffSink::new(config.command.clone())),
        ShutdownMode::FlagFile => Arc::new(FlagFileSink::new(config.flag_file_path())),
    }
}
