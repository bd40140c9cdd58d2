// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional per-job text transform applied to captured stdout.

use crate::error::TransformError;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Post-processes one job's captured stdout before it is written.
#[async_trait]
pub trait Transform: Send + Sync + 'static {
    async fn apply(&self, text: &str) -> Result<String, TransformError>;
}

/// Transform that pipes the payload through the host `awk` with a fixed
/// program. The CLI resolves script-vs-file before constructing this.
#[derive(Debug, Clone)]
pub struct AwkTransform {
    program: String,
}

impl AwkTransform {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Transform for AwkTransform {
    async fn apply(&self, text: &str) -> Result<String, TransformError> {
        let mut cmd = tokio::process::Command::new("awk");
        cmd.arg(&self.program);
        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| TransformError::Spawn { source })?;

        // awk stops reading stdin once its stdout pipe fills, so the payload
        // write and the output drain must run concurrently.
        let stdin_pipe = child.stdin.take();
        let feed = async {
            let Some(mut pipe) = stdin_pipe else {
                return Ok(());
            };
            let result = pipe.write_all(text.as_bytes()).await;
            drop(pipe); // close pipe to signal EOF
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|source| TransformError::Spawn { source })?;
        match fed {
            Ok(()) => {}
            // The program may exit without draining its input.
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(source) => return Err(TransformError::Spawn { source }),
        }

        if !output.status.success() {
            return Err(TransformError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Transform;
    use crate::error::TransformError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake transform for executor tests: uppercases its input, or fails
    /// every call when constructed with [`FakeTransform::failing`].
    #[derive(Clone, Default)]
    pub struct FakeTransform {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl FakeTransform {
        pub fn uppercase() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self { calls: Arc::default(), fail: true }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Transform for FakeTransform {
        async fn apply(&self, text: &str) -> Result<String, TransformError> {
            self.calls.lock().push(text.to_string());
            if self.fail {
                return Err(TransformError::Failed {
                    code: 2,
                    stderr: "fake transform failure".to_string(),
                });
            }
            Ok(text.to_uppercase())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransform;

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
