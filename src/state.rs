//! Shared supervisor state.
//!
//! The loop writes the child identifier, the signal listener reads it. Both go
//! through the same lock, so a delivery in flight finishes before `disarm`
//! returns and a delivery after `disarm` sees the relay unarmed.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nix::unistd::Pid;

/// Forwarding target guarded by the state lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target {
    /// Relay handles termination signals while true
    pub armed: bool,
    /// Child that receives forwarded interrupts
    pub child: Option<Pid>,
}

/// Process-wide state shared by the signal relay and the supervisor loop.
#[derive(Debug, Default)]
pub struct SupervisorState {
    target: Mutex<Target>,
    signal_received: AtomicBool,
    forwarded: AtomicU32,
}

impl SupervisorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the forwarding target.
    ///
    /// The guarded data is plain-old-data, so a poisoned lock is still usable.
    pub fn target(&self) -> MutexGuard<'_, Target> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enable forwarding and clear the per-run signal flag
    pub fn arm(&self) {
        self.target().armed = true;
        self.signal_received.store(false, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.target().armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.target().armed
    }

    pub fn record_child(&self, pid: Pid) {
        self.target().child = Some(pid);
    }

    pub fn clear_child(&self) {
        self.target().child = None;
    }

    /// Currently recorded child, if any
    pub fn child(&self) -> Option<Pid> {
        self.target().child
    }

    pub fn mark_signal_received(&self) {
        self.signal_received.store(true, Ordering::SeqCst);
    }

    /// Whether a termination signal arrived during the current run
    pub fn signal_received(&self) -> bool {
        self.signal_received.load(Ordering::SeqCst)
    }

    pub fn note_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::SeqCst);
    }

    /// Total interrupts forwarded since the supervisor started
    pub fn forwarded(&self) -> u32 {
        self.forwarded.load(Ordering::SeqCst)
    }
}
