// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command line surface.

use clap::Parser;

/// Run a command template in parallel over lists of inputs.
///
/// Inputs come from repeatable `-a` argument lists and/or stdin. Each job
/// gets one item from every list (shorter lists wrap around); placeholder
/// tokens in the template select and transform the items.
#[derive(Parser, Debug)]
#[command(name = "fanout", version, about)]
pub struct Cli {
    /// Command template; tokens like {}, {1}, {/}, {#} are expanded per job
    #[arg(value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// List of arguments: whitespace-separated items, {a..b} ranges and glob
    /// patterns expand (repeatable, one input list per flag)
    #[arg(short = 'a', long = "arguments", value_name = "LIST")]
    pub arguments: Vec<String>,

    /// Process each job's output with an awk program (or program file)
    #[arg(short = 'A', long = "awk", value_name = "PROGRAM")]
    pub awk: Option<String>,

    /// Show the commands that would run without running them
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Number of parallel tasks (0 means one per CPU)
    #[arg(short = 's', long = "slots", default_value_t = 8, value_name = "N")]
    pub slots: usize,

    /// Shuffle each argument list before running
    #[arg(short = 'S', long = "shuffle")]
    pub shuffle: bool,

    /// Run tasks one at a time in their incoming order
    #[arg(short = 'o', long = "ordered")]
    pub ordered: bool,

    /// Print job output in submission order
    #[arg(short = 'k', long = "keep-order")]
    pub keep_order: bool,

    /// Print empty lines for empty input and output
    #[arg(short = 'P', long = "print-empty")]
    pub print_empty: bool,

    /// Exit on the first error
    #[arg(short = 'E', long = "exit-on-error")]
    pub exit_on_error: bool,

    /// Send each job's input item to the command's stdin
    #[arg(short = 'I', long = "stdin")]
    pub stdin: bool,

    /// Split stdin at NUL bytes instead of newlines
    #[arg(short = '0', long = "null")]
    pub null: bool,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
