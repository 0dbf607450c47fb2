//! Supervisor loop.
//!
//! Each iteration goes Idle -> Running -> Classifying and then either back to
//! Running (restart), or stops with Exit or Shutdown. The relay is armed only
//! while a child is running.

use std::sync::Arc;

use log::{info, warn};

use super::report::RunReport;
use super::restart::RestartPolicy;
use crate::domain::{Decision, ExitCodePolicy, TerminationStatus};
use crate::error::{Result, SupervisorError};
use crate::runner::{ChildRunner, LaunchSpec};
use crate::signals::SignalRelay;
use crate::sink::DecisionSink;
use crate::state::SupervisorState;

/// Supervises a single child application.
pub struct Supervisor {
    launch: LaunchSpec,
    exit_codes: ExitCodePolicy,
    restart: RestartPolicy,
    runner: ChildRunner,
    relay: Arc<SignalRelay>,
    state: Arc<SupervisorState>,
    sink: Arc<dyn DecisionSink>,
}

impl Supervisor {
    /// Create a supervisor with the default exit-code contract and immediate restarts.
    pub fn new(launch: LaunchSpec, relay: Arc<SignalRelay>, sink: Arc<dyn DecisionSink>) -> Self {
        let state = relay.state().clone();
        Self {
            launch,
            exit_codes: ExitCodePolicy::default(),
            restart: RestartPolicy::default(),
            runner: ChildRunner::new(),
            relay,
            state,
            sink,
        }
    }

    pub fn with_exit_codes(mut self, exit_codes: ExitCodePolicy) -> Self {
        self.exit_codes = exit_codes;
        self
    }

    pub fn with_restart_policy(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    pub fn launch(&self) -> &LaunchSpec {
        &self.launch
    }

    /// Run children until one exits with the clean or shutdown code.
    ///
    /// Only spawn failures, wait failures and an exceeded restart limit end
    /// the loop with an error; in those cases the sink is never invoked.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        loop {
            let status = self.run_once().await?;
            report.runs.push(status);
            report.interrupts_forwarded = self.state.forwarded();

            let decision = self.exit_codes.classify(&status);
            match decision {
                Decision::Restart => {
                    info!("Application ended with {}", status);
                    if !self.restart.allows(report.restarts) {
                        warn!("Giving up after {} restarts", report.restarts);
                        return Err(SupervisorError::RestartLimit(report.restarts));
                    }
                    info!("Restarting application...");
                    report.restarts += 1;
                    if let Some(delay) = self.restart.delay() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Decision::Exit => {
                    info!("Exiting application...");
                    self.publish(decision).await;
                    report.decision = Some(decision);
                    return Ok(report);
                }
                Decision::Shutdown => {
                    info!("Shutting down...");
                    self.publish(decision).await;
                    report.decision = Some(decision);
                    return Ok(report);
                }
            }
        }
    }

    /// One Idle -> Running -> Classifying pass.
    async fn run_once(&self) -> Result<TerminationStatus> {
        self.relay.arm();
        info!("Starting application...");

        let mut child = match self.runner.start(&self.launch) {
            Ok(child) => child,
            Err(e) => {
                self.relay.disarm();
                return Err(e);
            }
        };
        if let Some(pid) = child.pid() {
            self.state.record_child(pid);
        }

        // The child stays unreaped until the relay lets go of its PID, so a
        // late forward can only hit the zombie, never a recycled PID
        let exited = self.runner.wait_for_exit(&child).await;

        // Disarm before clearing, so a late signal never finds an empty target
        self.relay.disarm();
        self.state.clear_child();
        exited?;

        let status = self.runner.wait(&mut child).await?;
        if self.state.signal_received() {
            info!("Application ended with {} after a forwarded signal", status);
        }
        Ok(status)
    }

    async fn publish(&self, decision: Decision) {
        if let Err(e) = self.sink.publish(decision).await {
            warn!("Failed to publish {} to {}: {}", decision, self.sink.describe(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Delivery, ProcessSignaller, TermSignal};
    use async_trait::async_trait;
    use nix::unistd::Pid;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<Decision>>,
    }

    #[async_trait]
    impl DecisionSink for RecordingSink {
        async fn publish(&self, decision: Decision) -> Result<()> {
            self.published.lock().unwrap().push(decision);
            Ok(())
        }

        fn describe(&self) -> String {
            "recording sink".to_string()
        }
    }

    struct NoopSignaller;

    impl ProcessSignaller for NoopSignaller {
        fn interrupt(&self, _pid: Pid) -> Result<()> {
            Ok(())
        }
    }

    fn supervisor(script: &str) -> (Supervisor, Arc<RecordingSink>) {
        let relay = Arc::new(SignalRelay::new(
            Arc::new(SupervisorState::new()),
            Arc::new(NoopSignaller),
        ));
        let sink = Arc::new(RecordingSink::default());
        let launch = LaunchSpec::new("/bin/sh").arg("-c").arg(script);
        (Supervisor::new(launch, relay, sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_clean_exit_disarms_relay() {
        let (supervisor, sink) = supervisor("exit 0");
        let report = supervisor.run().await.unwrap();

        assert_eq!(report.decision, Some(Decision::Exit));
        assert_eq!(*sink.published.lock().unwrap(), vec![Decision::Exit]);
        assert!(!supervisor.relay.is_armed());
        assert!(supervisor.state.child().is_none());
        assert_eq!(supervisor.relay.deliver(TermSignal::Terminate), Delivery::Unarmed);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_fatal_and_disarms() {
        let relay = Arc::new(SignalRelay::new(
            Arc::new(SupervisorState::new()),
            Arc::new(NoopSignaller),
        ));
        let sink = Arc::new(RecordingSink::default());
        let supervisor = Supervisor::new(LaunchSpec::new("/nonexistent/app"), relay, sink.clone());

        let err = supervisor.run().await.unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn { .. }));
        assert!(sink.published.lock().unwrap().is_empty());
        assert!(!supervisor.relay.is_armed());
    }

    #[tokio::test]
    async fn test_restart_limit() {
        let (supervisor, sink) = supervisor("exit 1");
        let supervisor = supervisor.with_restart_policy(RestartPolicy::immediate().with_max_restarts(2));

        let err = supervisor.run().await.unwrap_err();
        assert!(matches!(err, SupervisorError::RestartLimit(2)));
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restart_delay() {
        let temp = tempfile::TempDir::new().unwrap();
        let counter = temp.path().join("count");
        let script = format!(
            "n=$(cat {c} 2>/dev/null || echo 0); n=$((n+1)); echo $n > {c}; [ $n -ge 2 ] && exit 0; exit 1",
            c = counter.display()
        );
        let (supervisor, _sink) = supervisor(&script);
        let supervisor =
            supervisor.with_restart_policy(RestartPolicy::immediate().with_delay(Duration::from_millis(200)));

        let started = Instant::now();
        let report = supervisor.run().await.unwrap();
        assert_eq!(report.restarts, 1);
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_custom_exit_codes() {
        let (supervisor, sink) = supervisor("exit 0");
        let supervisor = supervisor.with_exit_codes(ExitCodePolicy { clean: 5, shutdown: 0 });

        let report = supervisor.run().await.unwrap();
        assert_eq!(report.decision, Some(Decision::Shutdown));
        assert_eq!(*sink.published.lock().unwrap(), vec![Decision::Shutdown]);
    }
}
