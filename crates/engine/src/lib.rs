// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fanout-engine: the concurrency-bounded job executor.
//!
//! Batches produced by `fanout-core` become [`Job`]s, admitted one permit at
//! a time under the run's concurrency budget and executed on their own tokio
//! task. The [`OutputSequencer`] serializes writes to the process streams and
//! optionally enforces submission order over completion order.

pub mod error;
pub mod executor;
pub mod job;
pub mod output;
pub mod runner;
pub mod transform;

pub use error::{ProcessError, RunError, TransformError};
pub use executor::{Dispatcher, RunConfig, RunStats};
pub use job::{Job, JobState};
pub use output::{OutputSequencer, OutputSink, StdioSink, Stream};
pub use runner::{ProcessOutput, ProcessRunner, ShellRunner};
pub use transform::{AwkTransform, Transform};

#[cfg(any(test, feature = "test-support"))]
pub use output::BufferSink;
#[cfg(any(test, feature = "test-support"))]
pub use runner::FakeRunner;
#[cfg(any(test, feature = "test-support"))]
pub use transform::FakeTransform;
