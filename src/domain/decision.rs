//! Exit-status classification.
//!
//! The exit codes are a contract with the child application: one code means
//! "I am done", another means "power the host off", everything else is a crash.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::status::TerminationStatus;

/// What the supervisor does after a child run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Start the child again
    Restart,
    /// Stop supervising, leave the host running
    Exit,
    /// Stop supervising and power off the host
    Shutdown,
}

impl Decision {
    /// Whether the loop stops after this decision
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Restart)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Restart => write!(f, "restart"),
            Decision::Exit => write!(f, "exit"),
            Decision::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Exit codes the child uses to request a clean exit or a host shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExitCodePolicy {
    /// Exit code meaning "stop, do not restart"
    pub clean: i32,

    /// Exit code meaning "stop and power off the host"
    pub shutdown: i32,
}

impl Default for ExitCodePolicy {
    fn default() -> Self {
        Self {
            clean: 0,
            shutdown: 2,
        }
    }
}

impl ExitCodePolicy {
    /// Map a termination status to the next action.
    ///
    /// Signal kills always restart, regardless of the signal number.
    pub fn classify(&self, status: &TerminationStatus) -> Decision {
        match *status {
            TerminationStatus::NormalExit(code) if code == self.clean => Decision::Exit,
            TerminationStatus::NormalExit(code) if code == self.shutdown => Decision::Shutdown,
            TerminationStatus::NormalExit(_) | TerminationStatus::SignaledExit(_) => Decision::Restart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codes() {
        let policy = ExitCodePolicy::default();
        assert_eq!(policy.clean, 0);
        assert_eq!(policy.shutdown, 2);
    }

    #[test]
    fn test_classify_clean_exit() {
        let policy = ExitCodePolicy::default();
        assert_eq!(policy.classify(&TerminationStatus::NormalExit(0)), Decision::Exit);
    }

    #[test]
    fn test_classify_shutdown() {
        let policy = ExitCodePolicy::default();
        assert_eq!(policy.classify(&TerminationStatus::NormalExit(2)), Decision::Shutdown);
    }

    #[test]
    fn test_classify_other_codes_restart() {
        let policy = ExitCodePolicy::default();
        for code in [1, 3, 42, 127, 255, -1] {
            assert_eq!(
                policy.classify(&TerminationStatus::NormalExit(code)),
                Decision::Restart,
                "code {} should restart",
                code
            );
        }
    }

    #[test]
    fn test_classify_signals_restart() {
        let policy = ExitCodePolicy::default();
        for signo in [2, 9, 11, 15] {
            assert_eq!(policy.classify(&TerminationStatus::SignaledExit(signo)), Decision::Restart);
        }
    }

    #[test]
    fn test_classify_custom_codes() {
        let policy = ExitCodePolicy { clean: 2, shutdown: 0 };
        assert_eq!(policy.classify(&TerminationStatus::NormalExit(0)), Decision::Shutdown);
        assert_eq!(policy.classify(&TerminationStatus::NormalExit(2)), Decision::Exit);
        assert_eq!(policy.classify(&TerminationStatus::NormalExit(1)), Decision::Restart);
    }

    #[test]
    fn test_decision_terminal() {
        assert!(!Decision::Restart.is_terminal());
        assert!(Decision::Exit.is_terminal());
        assert!(Decision::Shutdown.is_terminal());
    }

    #[test]
    fn test_policy_yaml() {
        let policy: ExitCodePolicy = serde_yaml::from_str("shutdown: 7").unwrap();
        assert_eq!(policy, ExitCodePolicy { clean: 0, shutdown: 7 });
    }
}
