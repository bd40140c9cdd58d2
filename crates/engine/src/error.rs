// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for job execution.

use thiserror::Error;

/// Errors from the process-spawning collaborator.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The shell could not be spawned at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// The command line that was handed to the shell.
        command: String,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The spawned command exited non-zero. Reported, never retried; the
    /// job still completes for scheduling purposes.
    #[error("command `{command}` exited with status {code}")]
    NonZeroExit {
        /// The command line that ran.
        command: String,
        /// The process exit code (-1 when terminated by signal).
        code: i32,
    },
}

/// Errors from the text-transform collaborator.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The transform process could not be spawned or fed.
    #[error("failed to run transform: {source}")]
    Spawn {
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The transform ran but reported failure.
    #[error("transform failed (exit {code}): {stderr}")]
    Failed {
        /// Transform process exit code.
        code: i32,
        /// Captured transform stderr, trimmed.
        stderr: String,
    },
}

/// Fatal errors that stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Template resolution failed under exit-on-error.
    #[error(transparent)]
    Template(#[from] fanout_core::TemplateError),

    /// Task-source contract violation.
    #[error(transparent)]
    Bounds(#[from] fanout_core::BoundsError),

    /// A job failed and exit-on-error is set; no further jobs are admitted.
    /// Jobs already in flight are not forcibly killed.
    #[error("run aborted after failed job (exit-on-error)")]
    Aborted,
}
