//! Child termination status.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::sys::signal::Signal;

/// Outcome of one child run.
///
/// A child killed by a signal is never folded into an exit code: the two are
/// different branches and classify differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationStatus {
    /// Child called exit with this code
    NormalExit(i32),
    /// Child was killed by this signal number
    SignaledExit(i32),
}

impl TerminationStatus {
    /// Signal name for `SignaledExit`, if the number maps to a known signal
    pub fn signal_name(&self) -> Option<&'static str> {
        match self {
            TerminationStatus::SignaledExit(signo) => Signal::try_from(*signo).ok().map(Signal::as_str),
            TerminationStatus::NormalExit(_) => None,
        }
    }

    pub fn is_signaled(&self) -> bool {
        matches!(self, TerminationStatus::SignaledExit(_))
    }
}

impl From<ExitStatus> for TerminationStatus {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => TerminationStatus::NormalExit(code),
            (None, Some(signo)) => TerminationStatus::SignaledExit(signo),
            // Stopped/continued statuses are never returned by wait()
            (None, None) => TerminationStatus::NormalExit(status.into_raw()),
        }
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationStatus::NormalExit(code) => write!(f, "exit code {}", code),
            TerminationStatus::SignaledExit(signo) => match self.signal_name() {
                Some(name) => write!(f, "signal {}", name),
                None => write!(f, "signal {}", signo),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_normal_exit() {
        // wait(2) encodes exit codes in the high byte
        let status = TerminationStatus::from(ExitStatus::from_raw(1 << 8));
        assert_eq!(status, TerminationStatus::NormalExit(1));

        let status = TerminationStatus::from(ExitStatus::from_raw(2 << 8));
        assert_eq!(status, TerminationStatus::NormalExit(2));
    }

    #[test]
    fn test_from_signaled_exit() {
        let status = TerminationStatus::from(ExitStatus::from_raw(sigint_raw()));
        assert_eq!(status, TerminationStatus::SignaledExit(2));
        assert!(status.is_signaled());
    }

    #[test]
    fn test_signal_is_not_an_exit_code() {
        // SIGINT is number 2, same as the shutdown exit code; they must not collide
        let signaled = TerminationStatus::from(ExitStatus::from_raw(sigint_raw()));
        assert_ne!(signaled, TerminationStatus::NormalExit(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(TerminationStatus::NormalExit(0).to_string(), "exit code 0");
        assert_eq!(TerminationStatus::SignaledExit(15).to_string(), "signal SIGTERM");
        assert_eq!(TerminationStatus::SignaledExit(200).to_string(), "signal 200");
    }

    #[test]
    fn test_signal_name() {
        assert_eq!(TerminationStatus::SignaledExit(9).signal_name(), Some("SIGKILL"));
        assert_eq!(TerminationStatus::NormalExit(9).signal_name(), None);
    }

    fn sigint_raw() -> i32 {
        Signal::SIGINT as i32
    }
}
