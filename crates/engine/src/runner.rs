// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-spawning collaborator: one shell invocation per job.

use crate::error::ProcessError;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Captured result of one spawned command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns a resolved command and captures its output.
#[async_trait]
pub trait ProcessRunner: Send + Sync + 'static {
    /// Run `command` to completion. `stdin` is an optional payload written
    /// to the child's stdin (the `--stdin` input mode).
    async fn run(&self, command: &str, stdin: Option<&str>) -> Result<ProcessOutput, ProcessError>;
}

/// Production runner: `sh -c <command>` via tokio's process support.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, command: &str, stdin: Option<&str>) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());
        // The coordinator may be reading items from its own stdin; children
        // never inherit it.
        cmd.stdin(if stdin.is_some() {
            std::process::Stdio::piped()
        } else {
            std::process::Stdio::null()
        });

        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

        // The child stops reading stdin once its stdout pipe fills, so the
        // payload write and the output drain must run concurrently.
        let stdin_pipe = child.stdin.take();
        let feed = async {
            let (Some(mut pipe), Some(payload)) = (stdin_pipe, stdin) else {
                return Ok(());
            };
            let result = pipe.write_all(payload.as_bytes()).await;
            drop(pipe); // close pipe to signal EOF
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;
        match fed {
            Ok(()) => {}
            // The child may exit without draining its input.
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(source) => {
                return Err(ProcessError::Spawn { command: command.to_string(), source })
            }
        }

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{ProcessOutput, ProcessRunner};
    use crate::error::ProcessError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded invocation.
    #[derive(Debug, Clone)]
    pub struct RunCall {
        pub command: String,
        pub stdin: Option<String>,
    }

    #[derive(Default)]
    struct FakeRunnerState {
        calls: Mutex<Vec<RunCall>>,
        delays: Mutex<VecDeque<Duration>>,
        exit_codes: Mutex<VecDeque<i32>>,
        fail_spawn: AtomicBool,
        running: AtomicUsize,
        max_running: AtomicUsize,
    }

    /// Fake runner for executor tests.
    ///
    /// Records every call, tracks the maximum number of simultaneously
    /// running invocations, and serves scripted per-call delays and exit
    /// codes. Stdout of every fake run is the command string itself.
    #[derive(Clone, Default)]
    pub struct FakeRunner {
        inner: Arc<FakeRunnerState>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a delay consumed by the next call, in call order.
        pub fn push_delay(&self, delay: Duration) {
            self.inner.delays.lock().push_back(delay);
        }

        /// Queue an exit code for an upcoming call (default 0).
        pub fn push_exit_code(&self, code: i32) {
            self.inner.exit_codes.lock().push_back(code);
        }

        /// Make every subsequent call fail to spawn.
        pub fn fail_spawn(&self) {
            self.inner.fail_spawn.store(true, Ordering::SeqCst);
        }

        pub fn calls(&self) -> Vec<RunCall> {
            self.inner.calls.lock().clone()
        }

        pub fn commands(&self) -> Vec<String> {
            self.inner.calls.lock().iter().map(|c| c.command.clone()).collect()
        }

        /// Highest observed count of simultaneously running calls.
        pub fn max_running(&self) -> usize {
            self.inner.max_running.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(
            &self,
            command: &str,
            stdin: Option<&str>,
        ) -> Result<ProcessOutput, ProcessError> {
            self.inner.calls.lock().push(RunCall {
                command: command.to_string(),
                stdin: stdin.map(str::to_string),
            });

            if self.inner.fail_spawn.load(Ordering::SeqCst) {
                return Err(ProcessError::Spawn {
                    command: command.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake spawn failure"),
                });
            }

            let delay = self.inner.delays.lock().pop_front();
            let running = self.inner.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.max_running.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.running.fetch_sub(1, Ordering::SeqCst);

            let exit_code = self.inner.exit_codes.lock().pop_front().unwrap_or(0);
            Ok(ProcessOutput {
                stdout: command.to_string(),
                stderr: String::new(),
                exit_code,
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRunner, RunCall};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
