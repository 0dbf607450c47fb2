//! Supervisor configuration.
//!
//! Loaded from an explicit path, .chaosvisor.yml or ~/.config/chaosvisor/chaosvisor.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ExitCodePolicy;
use crate::error::SupervisorError;
use crate::runner::LaunchSpec;
use crate::sink::DEFAULT_POWER_OFF_COMMAND;
use crate::supervisor::RestartPolicy;

/// Global configuration for Chaosvisor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Child application to supervise.
    pub child: ChildConfig,

    /// Exit-code contract with the child.
    #[serde(rename = "exit-codes")]
    pub exit_codes: ExitCodePolicy,

    /// Restart behaviour after a crash.
    pub restart: RestartPolicy,

    /// What happens on a shutdown request.
    pub shutdown: ShutdownConfig,

    /// Log sink settings.
    pub logging: LoggingConfig,
}

/// A loaded configuration together with what happened while finding it.
///
/// Loading runs before logging is set up, so diagnostics are kept here and
/// logged by the caller once a logger exists.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The configuration in effect.
    pub config: GlobalConfig,

    /// File the configuration came from, `None` for defaults.
    pub source: Option<PathBuf>,

    /// Config files that were found but could not be used.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    fn defaults(warnings: Vec<String>) -> Self {
        Self {
            config: GlobalConfig::default(),
            source: None,
            warnings,
        }
    }

    /// Log the config source and every skipped file.
    pub fn log_diagnostics(&self) {
        for warning in &self.warnings {
            log::warn!("{}", warning);
        }
        match &self.source {
            Some(path) => log::info!("Loaded config from {}", path.display()),
            None => log::info!("No usable config file found, using defaults"),
        }
    }
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .chaosvisor.yml in current directory
    /// 3. ~/.config/chaosvisor/chaosvisor.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
        Self::load_with_search_paths(config_path, &Self::search_paths())
    }

    /// Default config files, in priority order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".chaosvisor.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("chaosvisor").join("chaosvisor.yml"));
        }
        paths
    }

    /// Load from an explicit path, or the first usable file in `candidates`.
    ///
    /// An explicit path that fails is an error. A candidate that exists but
    /// fails is skipped and recorded as a warning.
    pub fn load_with_search_paths(config_path: Option<&PathBuf>, candidates: &[PathBuf]) -> Result<LoadedConfig> {
        if let Some(path) = config_path {
            let config =
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            return Ok(LoadedConfig {
                config,
                source: Some(path.clone()),
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();
        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => {
                    return Ok(LoadedConfig {
                        config,
                        source: Some(candidate.clone()),
                        warnings,
                    });
                }
                Err(e) => {
                    warnings.push(format!("Failed to load {}, skipping it: {:#}", candidate.display(), e));
                }
            }
        }

        Ok(LoadedConfig::defaults(warnings))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.exit_codes.clean == self.exit_codes.shutdown {
            eyre::bail!(
                "exit-codes.clean and exit-codes.shutdown must differ (both are {})",
                self.exit_codes.clean
            );
        }
        if self.shutdown.mode == ShutdownMode::PowerOff && self.shutdown.command.is_empty() {
            eyre::bail!("shutdown.command must not be empty in power-off mode");
        }
        Ok(())
    }
}

/// Child application settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChildConfig {
    /// Executable to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<PathBuf>,

    /// Arguments for the executable.
    pub args: Vec<String>,

    /// Working directory for the child.
    #[serde(rename = "working-dir", skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables.
    pub env: BTreeMap<String, String>,

    /// Append child stdout/stderr to this file instead of inheriting them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ChildConfig {
    /// Build the launch spec for the configured child.
    pub fn launch_spec(&self) -> crate::error::Result<LaunchSpec> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| SupervisorError::Config("no child program configured".to_string()))?;

        let mut spec = LaunchSpec::new(program).args(self.args.iter().cloned());
        if let Some(dir) = &self.working_dir {
            spec = spec.current_dir(dir);
        }
        for (key, value) in &self.env {
            spec = spec.env(key, value);
        }
        if let Some(output) = &self.output {
            spec = spec.output_to(output);
        }
        Ok(spec)
    }
}

/// How a shutdown request is carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShutdownMode {
    /// Run the power-off command directly
    #[default]
    PowerOff,
    /// Write the decision to a flag file for an outer launcher
    FlagFile,
}

/// Shutdown settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Decision sink to use.
    pub mode: ShutdownMode,

    /// Privileged power-off command and arguments.
    pub command: Vec<String>,

    /// Flag file path for flag-file mode.
    #[serde(rename = "flag-file", skip_serializing_if = "Option::is_none")]
    pub flag_file: Option<PathBuf>,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            mode: ShutdownMode::PowerOff,
            command: DEFAULT_POWER_OFF_COMMAND.iter().map(|s| s.to_string()).collect(),
            flag_file: None,
        }
    }
}

impl ShutdownConfig {
    /// Configured flag file, or `<runtime dir>/chaosvisor/shutdown`
    pub fn flag_file_path(&self) -> PathBuf {
        self.flag_file.clone().unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("chaosvisor")
                .join("shutdown")
        })
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when RUST_LOG is unset.
    pub level: String,

    /// Append log lines to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::config::DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}
