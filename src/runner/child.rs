//! Child runner: spawns the application and waits for it to terminate.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::process::Stdio;

use chrono::{DateTime, Local};
use log::debug;
use nix::errno::Errno;
use nix::sys::wait::{Id, WaitPidFlag, waitid};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use super::launch::{ChildOutput, LaunchSpec};
use crate::domain::TerminationStatus;
use crate::error::{Result, SupervisorError};

/// One running (or finished) instance of the child application.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    program: String,
    pid: Option<Pid>,
    started_at: DateTime<Local>,
    status: Option<TerminationStatus>,
}

impl ChildProcess {
    /// Process identifier, present only until the child has been reaped
    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Final status, once the child has been reaped
    pub fn status(&self) -> Option<TerminationStatus> {
        self.status
    }
}

/// Starts children and waits for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildRunner;

impl ChildRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawn the child described by `spec`.
    pub fn start(&self, spec: &LaunchSpec) -> Result<ChildProcess> {
        let program = spec.program_name();
        let spawn_err = |source| SupervisorError::Spawn {
            program: program.clone(),
            source,
        };

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::inherit());
        match &spec.output {
            ChildOutput::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            ChildOutput::Append(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(spawn_err)?;
                let err_file = file.try_clone().map_err(spawn_err)?;
                cmd.stdout(file).stderr(err_file);
            }
        }

        let child = cmd.spawn().map_err(spawn_err)?;
        let pid = child.id().map(|id| Pid::from_raw(id as i32));
        debug!("Spawned {} as PID {:?}", spec, pid);

        Ok(ChildProcess {
            child,
            program,
            pid,
            started_at: Local::now(),
            status: None,
        })
    }

    /// Block until the child has terminated, without reaping it.
    ///
    /// The child is left a zombie, so its PID stays reserved until
    /// [`wait`](Self::wait) reaps it. Interrupted waits are retried.
    pub async fn wait_for_exit(&self, process: &ChildProcess) -> Result<()> {
        let Some(pid) = process.pid else {
            return Ok(());
        };

        let exited = tokio::task::spawn_blocking(move || {
            loop {
                match waitid(Id::Pid(pid), WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT) {
                    // ECHILD: already reaped, `wait` reports what it can
                    Ok(_) | Err(Errno::ECHILD) => return Ok(()),
                    Err(Errno::EINTR) => continue,
                    Err(errno) => return Err(std::io::Error::from(errno)),
                }
            }
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|waited| waited);

        exited.map_err(|source| SupervisorError::Wait {
            program: process.program.clone(),
            source,
        })?;
        debug!("{} (PID {}) exited, not yet reaped", process.program, pid);
        Ok(())
    }

    /// Wait until the child has terminated and reap it.
    ///
    /// Interrupted waits are retried. Once the child is reaped its status is
    /// cached, so waiting again returns the same status.
    pub async fn wait(&self, process: &mut ChildProcess) -> Result<TerminationStatus> {
        if let Some(status) = process.status {
            return Ok(status);
        }

        loop {
            match process.child.wait().await {
                Ok(exit) => {
                    let status = TerminationStatus::from(exit);
                    let uptime = Local::now().signed_duration_since(process.started_at);
                    debug!(
                        "{} (PID {:?}) ended with {} after {}s",
                        process.program,
                        process.pid,
                        status,
                        uptime.num_seconds()
                    );
                    process.status = Some(status);
                    process.pid = None;
                    return Ok(status);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    debug!("Wait on {} interrupted before exit, waiting again", process.program);
                }
                Err(source) => {
                    return Err(SupervisorError::Wait {
                        program: process.program.clone(),
                        source,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::kill;
    use tempfile::TempDir;

    fn sh(script: &str) -> LaunchSpec {
        LaunchSpec::new("/bin/sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn test_normal_exit_code() {
        let runner = ChildRunner::new();
        let mut child = runner.start(&sh("exit 3")).unwrap();
        assert!(child.pid().is_some());

        let status = runner.wait(&mut child).await.unwrap();
        assert_eq!(status, TerminationStatus::NormalExit(3));
        assert!(child.pid().is_none());
        assert_eq!(child.status(), Some(status));
    }

    #[tokio::test]
    async fn test_signaled_exit_is_distinct() {
        let runner = ChildRunner::new();
        let mut child = runner.start(&sh("kill -TERM $$")).unwrap();

        let status = runner.wait(&mut child).await.unwrap();
        assert_eq!(status, TerminationStatus::SignaledExit(15));
    }

    #[tokio::test]
    async fn test_wait_twice_is_idempotent() {
        let runner = ChildRunner::new();
        let mut child = runner.start(&sh("exit 2")).unwrap();

        let first = runner.wait(&mut child).await.unwrap();
        let second = runner.wait(&mut child).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second, TerminationStatus::NormalExit(2));
    }

    #[tokio::test]
    async fn test_wait_for_exit_keeps_pid_reserved() {
        let runner = ChildRunner::new();
        let mut child = runner.start(&sh("exit 4")).unwrap();
        let pid = child.pid().unwrap();

        runner.wait_for_exit(&child).await.unwrap();

        // Exited but unreaped: the zombie still answers to its PID
        assert!(kill(pid, None).is_ok());
        assert_eq!(child.pid(), Some(pid));
        assert!(child.status().is_none());

        assert_eq!(runner.wait(&mut child).await.unwrap(), TerminationStatus::NormalExit(4));
        assert!(child.pid().is_none());
    }

    #[tokio::test]
    async fn test_wait_for_exit_after_reap_is_noop() {
        let runner = ChildRunner::new();
        let mut child = runner.start(&sh("exit 0")).unwrap();
        runner.wait(&mut child).await.unwrap();

        runner.wait_for_exit(&child).await.unwrap();
        assert_eq!(child.status(), Some(TerminationStatus::NormalExit(0)));
    }

    #[tokio::test]
    async fn test_spawn_missing_program() {
        let runner = ChildRunner::new();
        let err = runner
            .start(&LaunchSpec::new("/nonexistent/chaoscope"))
            .unwrap_err();
        match err {
            SupervisorError::Spawn { program, source } => {
                assert_eq!(program, "/nonexistent/chaoscope");
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("Expected spawn error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_output_appended_to_file() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("child.log");
        std::fs::write(&log, "previous\n").unwrap();

        let runner = ChildRunner::new();
        let spec = sh("echo out; echo err >&2").output_to(&log);
        let mut child = runner.start(&spec).unwrap();
        runner.wait(&mut child).await.unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.starts_with("previous\n"));
        assert!(content.contains("out\n"));
        assert!(content.contains("err\n"));
    }

    #[tokio::test]
    async fn test_env_and_working_dir() {
        let temp = TempDir::new().unwrap();
        let runner = ChildRunner::new();
        let spec = sh("[ \"$CHAOS_MODE\" = kiosk ] && [ \"$(pwd -P)\" = \"$EXPECTED\" ] && exit 0; exit 1")
            .env("CHAOS_MODE", "kiosk")
            .env("EXPECTED", temp.path().canonicalize().unwrap().display().to_string())
            .current_dir(temp.path());

        let mut child = runner.start(&spec).unwrap();
        assert_eq!(runner.wait(&mut child).await.unwrap(), TerminationStatus::NormalExit(0));
    }
}
