//! Signal relay: forwards termination signals to the running child.
//!
//! The relay is the handler body. It only reads shared state and issues at
//! most one kill per delivery; what to do about the child's exit is decided by
//! the supervisor loop once the wait returns.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use nix::sys::signal::Signal;
use nix::unistd::Pid;

use super::signaller::ProcessSignaller;
use crate::state::SupervisorState;

/// Termination-class signals the relay handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSignal {
    /// SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl TermSignal {
    pub fn signal(&self) -> Signal {
        match self {
            TermSignal::Interrupt => Signal::SIGINT,
            TermSignal::Terminate => Signal::SIGTERM,
        }
    }

    /// Exit status a shell reports for a process killed by this signal
    pub fn default_exit_code(&self) -> i32 {
        128 + self.signal() as i32
    }
}

impl fmt::Display for TermSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signal().as_str())
    }
}

/// What happened to one signal delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// An interrupt was sent to this child
    Forwarded(Pid),
    /// Sending to this child failed; it most likely already exited
    ForwardFailed(Pid),
    /// Armed, but no child is recorded
    NothingToInterrupt,
    /// Relay disarmed: default disposition applies
    Unarmed,
}

/// Forwards termination signals to the currently recorded child.
pub struct SignalRelay {
    state: Arc<SupervisorState>,
    signaller: Arc<dyn ProcessSignaller>,
}

impl SignalRelay {
    pub fn new(state: Arc<SupervisorState>, signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self { state, signaller }
    }

    /// Shared state this relay reads
    pub fn state(&self) -> &Arc<SupervisorState> {
        &self.state
    }

    /// Start handling termination signals; resets the signal-received flag.
    pub fn arm(&self) {
        self.state.arm();
        debug!("Signal relay armed");
    }

    /// Stop handling termination signals.
    ///
    /// Call only after the child is confirmed terminated and before its
    /// identifier is cleared.
    pub fn disarm(&self) {
        self.state.disarm();
        debug!("Signal relay disarmed");
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Handle one delivery of `signal`. Never fails.
    pub fn deliver(&self, signal: TermSignal) -> Delivery {
        let target = self.state.target();
        if !target.armed {
            return Delivery::Unarmed;
        }
        self.state.mark_signal_received();

        let Some(pid) = target.child else {
            info!("Received {}, no child to interrupt", signal);
            return Delivery::NothingToInterrupt;
        };

        info!("Interrupting child PID {}", pid);
        match self.signaller.interrupt(pid) {
            Ok(()) => {
                self.state.note_forwarded();
                Delivery::Forwarded(pid)
            }
            Err(e) => {
                warn!("{}", e);
                Delivery::ForwardFailed(pid)
            }
        }
    }
}

impl fmt::Debug for SignalRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRelay").field("state", &self.state).finish_non_exhaustive()
    }
}
