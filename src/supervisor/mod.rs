//! Supervisor module - the restart/exit/shutdown loop.
//!
//! - Supervisor: arms the relay, runs the child, classifies its exit
//! - RestartPolicy: optional delay and cap between restarts
//! - RunReport: what the loop did before stopping

mod report;
mod restart;
mod run_loop;

pub use report::RunReport;
pub use restart::RestartPolicy;
pub use run_loop::Supervisor;
