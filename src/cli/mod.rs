//! CLI module for chaosvisor - command-line interface.
//!
//! Parses the child command line and the options that override the config file.

pub mod commands;

pub use commands::Cli;
