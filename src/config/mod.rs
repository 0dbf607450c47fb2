//! Configuration system for Chaosvisor.
//!
//! Two layers:
//! 1. Config file (explicit path, .chaosvisor.yml or ~/.config/chaosvisor/chaosvisor.yml)
//! 2. Command-line overrides

use eyre::Result;
use std::path::PathBuf;

pub use self::global::{ChildConfig, GlobalConfig, LoadedConfig, LoggingConfig, ShutdownConfig, ShutdownMode};
pub use self::overrides::ConfigOverrides;

mod global;
mod overrides;

/// Short alias used by the binary.
pub type Config = GlobalConfig;

/// Default log level when RUST_LOG is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Load configuration and apply command-line overrides.
///
/// Nothing is logged here; call [`LoadedConfig::log_diagnostics`] once
/// logging is up.
pub fn load_config(explicit_path: Option<&PathBuf>, overrides: &ConfigOverrides) -> Result<LoadedConfig> {
    let mut loaded = GlobalConfig::load(explicit_path)?;
    overrides.apply(&mut loaded.config);
    loaded.config.validate()?;
    Ok(loaded)
}
