//! Error types for Chaosvisor
//!
//! Centralized error handling using thiserror. Only `Spawn`, `Wait`,
//! `RestartLimit` and `Config` stop the supervisor; the rest are absorbed
//! where they occur and only logged.

use thiserror::Error;

/// All error types that can occur while supervising a child
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Child could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Forwarding an interrupt to the child failed (usually already exited)
    #[error("Failed to interrupt PID {pid}: {source}")]
    SignalForward {
        pid: i32,
        #[source]
        source: nix::errno::Errno,
    },

    /// Waiting on the child failed for a reason other than interruption
    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Privileged power-off action failed
    #[error("Power-off failed: {0}")]
    PowerOff(String),

    /// Configured restart limit was exceeded
    #[error("Restart limit reached after {0} restarts")]
    RestartLimit(u32),

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Chaosvisor operations
pub type Result<T> = std::result::Result<T, SupervisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error() {
        let err = SupervisorError::Spawn {
            program: "/opt/chaoscope/run".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to spawn /opt/chaoscope/run: No such file or directory"
        );
    }

    #[test]
    fn test_signal_forward_error() {
        let err = SupervisorError::SignalForward {
            pid: 4242,
            source: nix::errno::Errno::ESRCH,
        };
        assert!(err.to_string().starts_with("Failed to interrupt PID 4242"));
    }

    #[test]
    fn test_power_off_error() {
        let err = SupervisorError::PowerOff("sudo exited with code 1".to_string());
        assert_eq!(err.to_string(), "Power-off failed: sudo exited with code 1");
    }

    #[test]
    fn test_restart_limit_error() {
        let err = SupervisorError::RestartLimit(5);
        assert_eq!(err.to_string(), "Restart limit reached after 5 restarts");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SupervisorError = io_err.into();
        assert!(matches!(err, SupervisorError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
