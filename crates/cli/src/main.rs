// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fanout: run a command template in parallel over lists of inputs.

mod args;
mod exit_error;
mod input;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use exit_error::ExitError;
use fanout_core::TaskSet;
use fanout_engine::{
    AwkTransform, Dispatcher, OutputSequencer, RunConfig, RunError, ShellRunner, StdioSink,
    Stream, Transform,
};
use std::io::{BufRead, IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("fanout: {exit}");
                }
                ExitCode::from(exit.code.clamp(0, 255) as u8)
            }
            None => {
                eprintln!("fanout: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

/// `RUST_LOG` controls verbosity. Diagnostics go to stderr so job output on
/// stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let template = cli.template.unwrap_or_default();
    let transform = awk_transform(cli.awk.as_deref())?;
    let config = RunConfig {
        slots: effective_slots(cli.slots),
        dry_run: cli.dry_run,
        ordered: cli.ordered,
        keep_order: cli.keep_order,
        print_empty: cli.print_empty,
        exit_on_error: cli.exit_on_error,
        stdin_to_command: cli.stdin,
    };
    let mut task_set = input::build_task_set(&cli.arguments, cli.shuffle)?;
    tracing::debug!(
        slots = config.width(),
        lists = task_set.sequences().len(),
        "starting run"
    );

    let mut dispatcher =
        Dispatcher::new(config, Arc::new(ShellRunner::new()), transform, StdioSink);

    // A piped stdin becomes the first input list, one job per line (or NUL
    // chunk); otherwise every batch comes from the registered lists. An empty
    // pipe falls back to the lists, so `fanout -a ...` works with stdin
    // closed.
    let run_result = if std::io::stdin().is_terminal() {
        dispatcher.run_template(&mut task_set, &template).await
    } else {
        let (streamed, result) =
            stream_stdin(&mut dispatcher, &mut task_set, &template, cli.null).await?;
        if streamed == 0 && result.is_ok() {
            dispatcher.run_template(&mut task_set, &template).await
        } else {
            result
        }
    };
    let wait_result = dispatcher.wait().await;

    match run_result.and(wait_result.map(drop)) {
        Ok(()) => Ok(()),
        // Per-job failures were already written to stderr as they happened.
        Err(RunError::Aborted | RunError::Template(_)) => {
            Err(ExitError::fatal(String::new()).into())
        }
        Err(err) => Err(ExitError::fatal(err.to_string()).into()),
    }
}

/// Dispatch one job per stdin item.
///
/// Returns how many items were dispatched alongside the run outcome; the
/// outer `Result` is stdin I/O, kept separate so the caller can still wait
/// for in-flight jobs after an abort.
async fn stream_stdin(
    dispatcher: &mut Dispatcher,
    task_set: &mut TaskSet,
    template: &str,
    split_at_null: bool,
) -> Result<(usize, Result<(), RunError>)> {
    let output = dispatcher.output();
    let mut streamed = 0;

    if split_at_null {
        // NUL framing has no incremental reader; the whole pipe is read up
        // front.
        let mut raw = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut raw)
            .context("reading stdin")?;
        let mut chunks: Vec<&[u8]> = raw.split(|byte| *byte == 0).collect();
        // A NUL-terminated stream ends in one empty chunk after the final
        // terminator; that is framing, not input.
        if chunks.last().is_some_and(|chunk| chunk.is_empty()) {
            chunks.pop();
        }
        for chunk in chunks {
            let item = String::from_utf8_lossy(chunk);
            if let Err(err) =
                stream_item(dispatcher, task_set, template, &output, &item, &mut streamed).await
            {
                return Ok((streamed, Err(err)));
            }
        }
    } else {
        // One job per line as lines arrive, so a live producer gets jobs
        // before EOF and a long pipe is never buffered whole.
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if let Err(err) =
                stream_item(dispatcher, task_set, template, &output, &line, &mut streamed).await
            {
                return Ok((streamed, Err(err)));
            }
        }
    }
    Ok((streamed, Ok(())))
}

async fn stream_item(
    dispatcher: &mut Dispatcher,
    task_set: &mut TaskSet,
    template: &str,
    output: &OutputSequencer,
    item: &str,
    streamed: &mut usize,
) -> Result<(), RunError> {
    let item = item.trim();
    if item.is_empty() {
        // The sequencer drops this unless print-empty is set.
        output.write(Stream::Stdout, "");
        return Ok(());
    }
    *streamed += 1;
    dispatcher.submit_stream_item(item, task_set, template).await
}

/// Slot count 0 means one task per available CPU.
fn effective_slots(slots: usize) -> usize {
    if slots == 0 {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    } else {
        slots
    }
}

/// A program argument with no spaces that names an existing file is read as
/// an awk script file; anything else is the program text itself.
fn awk_transform(awk: Option<&str>) -> Result<Option<Arc<dyn Transform>>> {
    let Some(program) = awk else {
        return Ok(None);
    };
    let program = if !program.contains(' ') && std::path::Path::new(program).is_file() {
        std::fs::read_to_string(program)
            .with_context(|| format!("reading awk program file {program}"))?
    } else {
        program.to_string()
    };
    Ok(Some(Arc::new(AwkTransform::new(program))))
}
