//! Signal relay module.
//!
//! - SignalRelay: arm/disarm and the forwarding handler body
//! - ProcessSignaller: how an interrupt reaches the child (kill(2) in production)
//! - install: OS-level SIGINT/SIGTERM listener feeding the relay

mod listener;
mod relay;
mod signaller;

pub use listener::install;
pub use relay::{Delivery, SignalRelay, TermSignal};
pub use signaller::{NixSignaller, ProcessSignaller};
