// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template expansion and input-list behavior through the real binary.

use crate::prelude::*;

#[test]
fn dry_run_prints_commands_without_running_them() {
    fanout()
        .args(&["-d", "-o", "-a", "1 2 3", "echo {}"])
        .passes()
        .stdout_lines(&["echo 1", "echo 2", "echo 3"]);
}

#[test]
fn two_lists_pair_round_robin_with_wrapping() {
    fanout()
        .args(&["-d", "-o", "-a", "a b c", "-a", "x y", "echo {1}-{2}"])
        .passes()
        .stdout_lines(&["echo a-x", "echo b-y", "echo c-x"]);
}

#[test]
fn path_tokens_transform_the_item() {
    fanout()
        .args(&["-d", "-o", "-a", "dir/file.tar.gz", "echo {/} {.} {//}"])
        .passes()
        .stdout_lines(&["echo file.tar.gz dir/file.tar dir"]);
}

#[test]
fn sequence_token_counts_jobs_from_one() {
    fanout()
        .args(&["-d", "-o", "-a", "a b", "echo {#} {}"])
        .passes()
        .stdout_lines(&["echo 1 a", "echo 2 b"]);
}

#[test]
fn bare_template_gets_the_item_appended() {
    fanout()
        .args(&["-d", "-o", "-a", "x y", "echo"])
        .passes()
        .stdout_lines(&["echo x", "echo y"]);
}

#[test]
fn numeric_ranges_expand_into_items() {
    fanout()
        .args(&["-d", "-o", "-a", "{4..6}", "echo {}"])
        .passes()
        .stdout_lines(&["echo 4", "echo 5", "echo 6"]);
}

#[test]
fn placeholder_only_template_echoes_items_without_a_shell() {
    fanout()
        .args(&["-o", "-a", "alpha beta", "{}"])
        .passes()
        .stdout_lines(&["alpha", "beta"]);
}

#[test]
fn commands_actually_execute() {
    fanout()
        .args(&["-o", "-a", "hello world", "echo {}"])
        .passes()
        .stdout_lines(&["hello", "world"]);
}

#[test]
fn awk_program_rewrites_job_output() {
    fanout()
        .args(&["-o", "-A", "{print $1}", "-a", "a b", "echo {} trailing"])
        .passes()
        .stdout_lines(&["a", "b"]);
}
