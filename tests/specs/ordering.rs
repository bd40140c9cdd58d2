// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution-order and output-order guarantees.

use crate::prelude::*;

#[test]
fn ordered_mode_runs_jobs_one_at_a_time_in_input_order() {
    fanout()
        .args(&["-o", "-a", "1 2 3", "echo {} {%}"])
        .passes()
        .stdout_lines(&["1 1", "2 1", "3 1"]);
}

#[test]
fn single_slot_preserves_input_order() {
    fanout()
        .args(&["-s", "1", "-a", "a b c", "echo {}"])
        .passes()
        .stdout_lines(&["a", "b", "c"]);
}

/// Later jobs finish first (shorter sleeps), but keep-order flushes output
/// in submission order.
#[test]
fn keep_order_restores_submission_order() {
    fanout()
        .args(&["-k", "-s", "3", "-a", "3 2 1", "sleep 0.{} && echo {}"])
        .passes()
        .stdout_lines(&["3", "2", "1"]);
}

#[test]
fn slot_token_stays_within_the_budget() {
    fanout()
        .args(&["-d", "-s", "2", "-k", "-a", "a b c d", "echo {%}"])
        .passes()
        .stdout_lines(&["echo 1 a", "echo 2 b", "echo 2 c", "echo 1 d"]);
}
