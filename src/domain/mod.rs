//! Domain types for Chaosvisor
//!
//! - TerminationStatus: how one child run ended (exit code or signal)
//! - Decision: what the loop does next (restart, exit, shutdown)
//! - ExitCodePolicy: the exit-code contract with the child application

pub mod decision;
pub mod status;

pub use decision::{Decision, ExitCodePolicy};
pub use status::TerminationStatus;
