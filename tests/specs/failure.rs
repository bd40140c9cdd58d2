// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure reporting and exit codes.

use crate::prelude::*;

#[test]
fn nonzero_exit_is_reported_but_the_run_succeeds() {
    fanout()
        .args(&["-o", "-a", "1 2", "test -f /nonexistent/{}"])
        .passes()
        .stderr_has("exited with status 1");
}

#[test]
fn exit_on_error_makes_the_run_fail() {
    fanout()
        .args(&["-o", "-E", "-a", "1 2 3", "test -f /nonexistent/{}"])
        .fails()
        .stderr_has("exited with status 1");
}

#[test]
fn out_of_range_token_is_reported_per_batch() {
    fanout()
        .args(&["-o", "-a", "a b", "echo {5}"])
        .passes()
        .stderr_has("out of range")
        .stdout_line_count(0);
}

#[test]
fn out_of_range_token_fails_the_run_under_exit_on_error() {
    fanout().args(&["-o", "-E", "-a", "a", "echo {5}"]).fails().stderr_has("out of range");
}

#[test]
fn reversed_range_is_rejected_up_front() {
    fanout()
        .args(&["-a", "{5..2}", "echo {}"])
        .fails()
        .stderr_has("start 5 > end 2");
}

#[test]
fn failed_jobs_do_not_block_later_ones() {
    fanout()
        .args(&["-o", "-a", "1 2", "test {} = 2 && echo ok-{}"])
        .passes()
        .stdout_lines(&["ok-2"])
        .stderr_has("exited with status 1");
}
