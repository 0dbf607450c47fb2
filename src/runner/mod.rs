//! Child runner module.
//!
//! - LaunchSpec: program, args, environment and output handling
//! - ChildRunner: spawns the child and waits for its TerminationStatus
//! - ChildProcess: one run, owned by the supervisor loop

mod child;
mod launch;

pub use child::{ChildProcess, ChildRunner};
pub use launch::{ChildOutput, LaunchSpec};
