// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission-controlled job dispatch.
//!
//! A single coordinator enumerates batches and submits jobs; each admitted
//! job runs on its own tokio task under a semaphore permit sized to the
//! concurrency budget. Acquiring a permit is the only backpressure: excess
//! submissions block the coordinator instead of queueing unboundedly.

use crate::error::{ProcessError, RunError};
use crate::job::{Job, JobState};
use crate::output::{OutputSequencer, OutputSink, Stream};
use crate::runner::ProcessRunner;
use crate::transform::Transform;
use fanout_core::source::{Batch, TaskSet};
use fanout_core::template::{resolve, resolve_without_defaults, Rendered};
use fanout_core::TemplateError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Per-run configuration. Fixed once the first job is admitted: the
/// dispatcher sizes its permit pool at construction and never resizes.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Concurrency budget width (number of slots).
    pub slots: usize,
    /// Resolve and print commands without spawning processes.
    pub dry_run: bool,
    /// Force strictly sequential execution (collapses the budget to 1).
    pub ordered: bool,
    /// Flush output in submission order rather than completion order.
    pub keep_order: bool,
    /// Emit blank lines for empty input/output instead of dropping them.
    pub print_empty: bool,
    /// Abort the run after the first failing job.
    pub exit_on_error: bool,
    /// Feed each job's first batch item to the child's stdin instead of
    /// substituting it into the command line.
    pub stdin_to_command: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            slots: 8,
            dry_run: false,
            ordered: false,
            keep_order: false,
            print_empty: false,
            exit_on_error: false,
            stdin_to_command: false,
        }
    }
}

impl RunConfig {
    /// Effective concurrency width: ordered execution is width 1, and a
    /// width below 1 would wedge the pool.
    pub fn width(&self) -> usize {
        if self.ordered {
            1
        } else {
            self.slots.max(1)
        }
    }
}

/// Outcome counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Jobs admitted to the pool.
    pub submitted: u64,
    /// Jobs that completed with exit code 0 (including dry-run and
    /// pass-through jobs).
    pub succeeded: u64,
    /// Jobs that exited non-zero, failed to spawn, or whose transform
    /// failed.
    pub failed: u64,
    /// Batches whose template never resolved; no process was spawned.
    pub template_failures: u64,
}

#[derive(Default)]
struct Counters {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

/// Everything a job task needs, detached from the dispatcher's lifetime.
struct JobContext {
    dry_run: bool,
    exit_on_error: bool,
    stdin_to_command: bool,
    runner: Arc<dyn ProcessRunner>,
    transform: Option<Arc<dyn Transform>>,
    output: Arc<OutputSequencer>,
    fatal: Arc<AtomicBool>,
    counters: Arc<Counters>,
}

/// The bounded job pool and its coordinator-facing surface.
pub struct Dispatcher {
    config: RunConfig,
    runner: Arc<dyn ProcessRunner>,
    transform: Option<Arc<dyn Transform>>,
    output: Arc<OutputSequencer>,
    semaphore: Arc<Semaphore>,
    jobs: JoinSet<()>,
    fatal: Arc<AtomicBool>,
    counters: Arc<Counters>,
    submitted: u64,
    template_failures: u64,
}

impl Dispatcher {
    pub fn new(
        config: RunConfig,
        runner: Arc<dyn ProcessRunner>,
        transform: Option<Arc<dyn Transform>>,
        sink: impl OutputSink,
    ) -> Self {
        let output = Arc::new(OutputSequencer::new(sink, config.keep_order, config.print_empty));
        let semaphore = Arc::new(Semaphore::new(config.width()));
        Self {
            config,
            runner,
            transform,
            output,
            semaphore,
            jobs: JoinSet::new(),
            fatal: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(Counters::default()),
            submitted: 0,
            template_failures: 0,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Shared handle to the run's output sequencer, for coordinator-side
    /// writes (streaming-mode blank lines).
    pub fn output(&self) -> Arc<OutputSequencer> {
        Arc::clone(&self.output)
    }

    /// Enumerate every batch of a materialized task set and dispatch it.
    ///
    /// Produces exactly `task_set.max()` batches. Batches whose items are
    /// all blank are skipped (a blank line under print-empty); everything
    /// else becomes a job.
    pub async fn run_template(
        &mut self,
        task_set: &mut TaskSet,
        template: &str,
    ) -> Result<(), RunError> {
        for _ in 0..task_set.max() {
            if self.fatal.load(Ordering::SeqCst) {
                return Err(RunError::Aborted);
            }
            let (batch, _at_end) = task_set.next_batch()?;
            self.dispatch_batch(task_set, batch, template).await?;
        }
        Ok(())
    }

    /// Streaming mode: dispatch one incoming item, extended with one batch
    /// pull from any registered sequences.
    pub async fn submit_stream_item(
        &mut self,
        item: &str,
        task_set: &mut TaskSet,
        template: &str,
    ) -> Result<(), RunError> {
        if self.fatal.load(Ordering::SeqCst) {
            return Err(RunError::Aborted);
        }
        let mut batch: Batch = vec![item.to_string()];
        if !task_set.is_empty() {
            let (rest, _at_end) = task_set.next_batch()?;
            batch.extend(rest);
        }
        self.dispatch_batch(task_set, batch, template).await
    }

    /// Resolve one batch and submit the job. The sequence counter advances
    /// only for dispatched jobs; skipped and failed-construction batches do
    /// not consume a number.
    async fn dispatch_batch(
        &mut self,
        task_set: &TaskSet,
        batch: Batch,
        template: &str,
    ) -> Result<(), RunError> {
        if batch.iter().all(|item| item.trim().is_empty()) {
            let ticket = self.output.ticket();
            self.output.flush(ticket, &[(Stream::Stdout, "")]).await;
            return Ok(());
        }

        let sequence = task_set.sequence();
        // Under stdin delivery the item never lands on the command line, so
        // a bare template stays bare.
        let resolved: Result<Rendered, TemplateError> = if self.config.stdin_to_command {
            resolve_without_defaults(template, &batch, sequence, self.config.width(), true)
        } else {
            resolve(template, &batch, sequence, self.config.width(), true)
        };
        match resolved {
            Ok(rendered) => {
                let job = Job::new(rendered, batch, sequence, self.config.width());
                self.submit(job).await?;
                task_set.increment_sequence();
                Ok(())
            }
            Err(err) => {
                self.template_failures += 1;
                self.output.write(Stream::Stderr, &err.to_string());
                if self.config.exit_on_error {
                    self.fatal.store(true, Ordering::SeqCst);
                    return Err(RunError::Template(err));
                }
                Ok(())
            }
        }
    }

    /// Admit one job: blocks until a budget permit is free, then runs the
    /// job on its own task. The permit is released when the task ends, on
    /// every path.
    pub async fn submit(&mut self, job: Job) -> Result<(), RunError> {
        if self.fatal.load(Ordering::SeqCst) {
            return Err(RunError::Aborted);
        }
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| RunError::Aborted)?;
        // A failing job may have flipped the flag while we were blocked on
        // the permit.
        if self.fatal.load(Ordering::SeqCst) {
            return Err(RunError::Aborted);
        }
        self.submitted += 1;

        let ticket = self.output.ticket();
        let ctx = JobContext {
            dry_run: self.config.dry_run,
            exit_on_error: self.config.exit_on_error,
            stdin_to_command: self.config.stdin_to_command,
            runner: Arc::clone(&self.runner),
            transform: self.transform.clone(),
            output: Arc::clone(&self.output),
            fatal: Arc::clone(&self.fatal),
            counters: Arc::clone(&self.counters),
        };
        let span = tracing::info_span!("job", seq = job.sequence, slot = job.slot);
        self.jobs.spawn(
            async move {
                let _permit = permit;
                run_job(ctx, job, ticket).await;
            }
            .instrument(span),
        );
        Ok(())
    }

    /// Wait for every in-flight job and report the run outcome.
    pub async fn wait(mut self) -> Result<RunStats, RunError> {
        while self.jobs.join_next().await.is_some() {}
        let stats = RunStats {
            submitted: self.submitted,
            succeeded: self.counters.succeeded.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
            template_failures: self.template_failures,
        };
        if self.fatal.load(Ordering::SeqCst) {
            Err(RunError::Aborted)
        } else {
            Ok(stats)
        }
    }
}

async fn run_job(ctx: JobContext, job: Job, ticket: u64) {
    let start = Instant::now();
    tracing::debug!(command = %job.command, state = %JobState::Admitted, "job admitted");

    // Dry-run and pass-through jobs never reach the process spawner.
    if ctx.dry_run || job.is_empty {
        ctx.output.flush(ticket, &[(Stream::Stdout, job.command.as_str())]).await;
        ctx.counters.succeeded.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(state = %JobState::Succeeded, "job complete without spawn");
        return;
    }

    let stdin = if ctx.stdin_to_command {
        job.batch.first().map(String::as_str)
    } else {
        None
    };

    tracing::debug!(state = %JobState::Running, "spawning");
    match ctx.runner.run(&job.command, stdin).await {
        Ok(output) => {
            let stdout = match &ctx.transform {
                Some(transform) => match transform.apply(&output.stdout).await {
                    Ok(transformed) => transformed,
                    Err(err) => {
                        ctx.output.flush(ticket, &[(Stream::Stderr, err.to_string().as_str())]).await;
                        ctx.counters.failed.fetch_add(1, Ordering::SeqCst);
                        if ctx.exit_on_error {
                            ctx.fatal.store(true, Ordering::SeqCst);
                        }
                        tracing::warn!(error = %err, state = %JobState::Failed, "transform failed");
                        return;
                    }
                },
                None => output.stdout.clone(),
            };

            let mut lines: Vec<(Stream, String)> = vec![(Stream::Stdout, stdout)];
            if !output.stderr.trim_end().is_empty() {
                lines.push((Stream::Stderr, output.stderr.clone()));
            }
            if !output.success() {
                let report = ProcessError::NonZeroExit {
                    command: job.command.clone(),
                    code: output.exit_code,
                };
                lines.push((Stream::Stderr, report.to_string()));
            }
            let entries: Vec<(Stream, &str)> =
                lines.iter().map(|(stream, text)| (*stream, text.as_str())).collect();
            ctx.output.flush(ticket, &entries).await;

            tracing::info!(
                exit_code = output.exit_code,
                duration_ms = start.elapsed().as_millis() as u64,
                "job finished"
            );
            if output.success() {
                ctx.counters.succeeded.fetch_add(1, Ordering::SeqCst);
            } else {
                ctx.counters.failed.fetch_add(1, Ordering::SeqCst);
                if ctx.exit_on_error {
                    ctx.fatal.store(true, Ordering::SeqCst);
                }
            }
        }
        Err(err) => {
            ctx.output.flush(ticket, &[(Stream::Stderr, err.to_string().as_str())]).await;
            ctx.counters.failed.fetch_add(1, Ordering::SeqCst);
            if ctx.exit_on_error {
                ctx.fatal.store(true, Ordering::SeqCst);
            }
            tracing::warn!(error = %err, state = %JobState::Failed, "spawn failed");
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
