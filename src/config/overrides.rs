//! Command-line overrides.
//!
//! Applied on top of the loaded config file; anything set here wins.

use std::path::PathBuf;

use super::global::{GlobalConfig, ShutdownMode};

/// Configuration overrides taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Program followed by its arguments.
    pub command: Option<Vec<String>>,

    /// Override the clean exit code.
    pub clean_code: Option<i32>,

    /// Override the shutdown exit code.
    pub shutdown_code: Option<i32>,

    /// Use flag-file mode with this path.
    pub flag_file: Option<PathBuf>,

    /// Override the supervisor log file.
    pub log_file: Option<PathBuf>,

    /// Override the child output file.
    pub child_output: Option<PathBuf>,

    /// Override the restart delay in milliseconds.
    pub restart_delay_ms: Option<u64>,

    /// Override the restart limit.
    pub max_restarts: Option<u32>,
}

impl ConfigOverrides {
    /// Create empty overrides (no overrides applied).
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any overrides are set.
    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut GlobalConfig) {
        if let Some((program, args)) = self.command.as_deref().and_then(<[String]>::split_first) {
            config.child.program = Some(PathBuf::from(program));
            config.child.args = args.to_vec();
        }
        if let Some(code) = self.clean_code {
            config.exit_codes.clean = code;
        }
        if let Some(code) = self.shutdown_code {
            config.exit_codes.shutdown = code;
        }
        if let Some(path) = &self.flag_file {
            config.shutdown.mode = ShutdownMode::FlagFile;
            config.shutdown.flag_file = Some(path.clone());
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        if let Some(path) = &self.child_output {
            config.child.output = Some(path.clone());
        }
        if let Some(ms) = self.restart_delay_ms {
            config.restart.delay_ms = ms;
        }
        if let Some(max) = self.max_restarts {
            config.restart.max_restarts = Some(max);
        }
    }
}
