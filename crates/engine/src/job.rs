// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unit of work: one fully-resolved, independently executable command.

use fanout_core::source::Batch;
use fanout_core::template::{slot_number, Rendered};
use std::fmt;

/// One resolved job.
///
/// Immutable once constructed: the template is expanded into a fresh command
/// string per batch, so concurrent jobs share nothing. Consumed exactly once
/// by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// The expanded, shell-ready command line.
    pub command: String,
    /// True when no shell process should be spawned (blank or
    /// placeholder-only template); the command text is written directly.
    pub is_empty: bool,
    /// Job sequence number (`{#}`).
    pub sequence: u64,
    /// Worker slot number in `[1, width]` (`{%}`).
    pub slot: u64,
    /// The source batch this job was built from.
    pub batch: Batch,
}

impl Job {
    /// Build a job from a resolved template and the batch it consumed.
    pub fn new(rendered: Rendered, batch: Batch, sequence: u64, width: usize) -> Self {
        Self {
            command: rendered.command,
            is_empty: rendered.is_empty,
            sequence,
            slot: slot_number(sequence, width),
            batch,
        }
    }
}

/// Lifecycle of a job inside the dispatcher.
///
/// `Pending -> Admitted -> Running -> {Succeeded, Failed}`. Admission is
/// gated on a concurrency-budget permit; `Failed` is reserved for jobs that
/// never reached a process (construction failures). A process that runs and
/// exits non-zero still ends `Succeeded` for scheduling purposes; the
/// failure is reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Admitted,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Admitted => "admitted",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
