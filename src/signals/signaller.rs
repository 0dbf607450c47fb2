//! Sending interrupts to the child.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::error::{Result, SupervisorError};

/// Delivers an interrupt to a process.
pub trait ProcessSignaller: Send + Sync {
    /// Send one interrupt-equivalent signal to `pid`
    fn interrupt(&self, pid: Pid) -> Result<()>;
}

/// Signaller backed by kill(2), sending SIGINT.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl ProcessSignaller for NixSignaller {
    fn interrupt(&self, pid: Pid) -> Result<()> {
        kill(pid, Signal::SIGINT).map_err(|source| SupervisorError::SignalForward {
            pid: pid.as_raw(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_interrupt_exited_process_fails() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);
        child.wait().unwrap();

        let err = NixSignaller.interrupt(pid).unwrap_err();
        assert!(matches!(err, SupervisorError::SignalForward { .. }));
    }

    #[test]
    fn test_interrupt_running_process() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let pid = Pid::from_raw(child.id() as i32);

        NixSignaller.interrupt(pid).unwrap();

        let status = child.wait().unwrap();
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status.signal(), Some(Signal::SIGINT as i32));
    }
}
