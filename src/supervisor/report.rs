//! Summary of a supervisor run.

use std::fmt;

use crate::domain::{Decision, TerminationStatus};

/// What the supervisor loop did before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Status of every child run, in order
    pub runs: Vec<TerminationStatus>,
    /// Number of restarts performed
    pub restarts: u32,
    /// Interrupts forwarded to children across all runs
    pub interrupts_forwarded: u32,
    /// Terminal decision, once the loop has stopped
    pub decision: Option<Decision>,
}

impl RunReport {
    pub fn last_status(&self) -> Option<TerminationStatus> {
        self.runs.last().copied()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} run(s), {} restart(s)", self.runs.len(), self.restarts)?;
        if self.interrupts_forwarded > 0 {
            write!(f, ", {} interrupt(s) forwarded", self.interrupts_forwarded)?;
        }
        if let Some(decision) = self.decision {
            write!(f, ", decision: {}", decision)?;
        }
        Ok(())
    }
}
