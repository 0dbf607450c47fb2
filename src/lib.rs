//! Chaosvisor - a single-child process supervisor
//!
//! Chaosvisor launches one application, forwards termination signals to it,
//! and decides from its exit status whether to restart it, stop, or power off
//! the host.

pub mod config;
pub mod domain;
pub mod error;
pub mod runner;
pub mod signals;
pub mod sink;
pub mod state;
pub mod supervisor;

pub use error::{Result, SupervisorError};
