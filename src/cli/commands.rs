//! CLI definition using clap.
//!
//! Usage: `chaosvisor [OPTIONS] [-- <PROGRAM> [ARGS]...]`

use clap::Parser;
use std::path::PathBuf;

use chaosvisor::config::ConfigOverrides;

/// Chaosvisor - keeps one application running, restarts it on crashes and
/// powers off the host when it asks to
#[derive(Parser, Debug)]
#[command(name = "chaosvisor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit code meaning "stop, do not restart"
    #[arg(long, value_name = "CODE", allow_negative_numbers = true)]
    pub clean_code: Option<i32>,

    /// Exit code meaning "stop and power off the host"
    #[arg(long, value_name = "CODE", allow_negative_numbers = true)]
    pub shutdown_code: Option<i32>,

    /// Write the shutdown decision to this file instead of powering off
    #[arg(long, value_name = "PATH")]
    pub flag_file: Option<PathBuf>,

    /// Append supervisor log lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append child stdout/stderr to this file
    #[arg(long, value_name = "PATH")]
    pub child_output: Option<PathBuf>,

    /// Delay between a crash and the next start, in milliseconds
    #[arg(long, value_name = "MS")]
    pub restart_delay_ms: Option<u64>,

    /// Give up after this many restarts
    #[arg(long, value_name = "N")]
    pub max_restarts: Option<u32>,

    /// Program to supervise, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Config overrides from the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            command: (!self.command.is_empty()).then(|| self.command.clone()),
            clean_code: self.clean_code,
            shutdown_code: self.shutdown_code,
            flag_file: self.flag_file.clone(),
            log_file: self.log_file.clone(),
            child_output: self.child_output.clone(),
            restart_delay_ms: self.restart_delay_ms,
            max_restarts: self.max_restarts,
        }
    }
}
