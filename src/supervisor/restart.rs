//! # Restart policy for crashed children.
//!
//! By default a crashed child is restarted immediately and without limit.
//! Both a fixed delay between restarts and a cap on the number of restarts
//! can be opted into for crash-loop protection.
//!
//! No child exists during the delay and the signal relay is disarmed, so a
//! SIGINT or SIGTERM that arrives then ends the supervisor with the default
//! status (130 or 143) instead of waiting for the next start.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Controls what happens between a crash and the next start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestartPolicy {
    /// Delay before restarting, in milliseconds (0 = immediately)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Maximum number of restarts before giving up (unset = unlimited)
    #[serde(rename = "max-restarts", skip_serializing_if = "Option::is_none")]
    pub max_restarts: Option<u32>,
}

impl RestartPolicy {
    /// Restart immediately, forever
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_max_restarts(mut self, max: u32) -> Self {
        self.max_restarts = Some(max);
        self
    }

    /// Delay to apply before the next start, if any
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }

    /// Whether another restart is allowed after `restarts` have happened
    pub fn allows(&self, restarts: u32) -> bool {
        self.max_restarts.is_none_or(|max| restarts < max)
    }
}
