//! OS signal listener.
//!
//! Registers SIGINT and SIGTERM once and feeds every delivery to the relay.
//! The registration outlives arm/disarm; disarming makes the relay report
//! `Unarmed`, and the listener then finishes with that signal so the caller
//! can apply the default action.

use std::sync::Arc;

use log::debug;
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;

use super::relay::{Delivery, SignalRelay, TermSignal};

/// Install the process signal listener for `relay`.
///
/// The returned task resolves to the first signal that arrived while the
/// relay was unarmed, or `None` if the signal streams closed. The caller owns
/// the exit; `TermSignal::default_exit_code` gives the status the default
/// disposition would have produced.
///
/// Must be called from within a tokio runtime.
pub fn install(relay: Arc<SignalRelay>) -> std::io::Result<JoinHandle<Option<TermSignal>>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = sigint.recv() => TermSignal::Interrupt,
                Some(()) = sigterm.recv() => TermSignal::Terminate,
                else => return None,
            };

            match relay.deliver(received) {
                Delivery::Unarmed => return Some(received),
                delivery => debug!("{} handled: {:?}", received, delivery),
            }
        }
    }))
}
