// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Piped-stdin input modes.

use crate::prelude::*;

#[test]
fn stdin_lines_become_jobs() {
    fanout()
        .stdin("a\nb\n")
        .args(&["-o", "echo {}"])
        .passes()
        .stdout_lines(&["a", "b"]);
}

#[test]
fn jobs_start_before_stdin_reaches_eof() {
    use std::io::{BufRead, BufReader, Write};
    use std::time::Duration;

    // assert_cmd closes stdin up front, so drive the pipes by hand: the
    // first line must produce output while the pipe is still open.
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("fanout"))
        .arg("echo {}")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("spawn fanout");
    let mut stdin = child.stdin.take().expect("stdin handle");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout handle"));

    stdin.write_all(b"first\n").expect("write item");
    stdin.flush().expect("flush item");

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        stdout.read_line(&mut line).ok();
        let _ = tx.send(line);
    });
    let line = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("first job should run before stdin closes");
    assert_eq!(line, "first\n");

    drop(stdin);
    let status = child.wait().expect("wait for fanout");
    assert!(status.success());
}

#[test]
fn items_with_spaces_are_quoted_for_the_shell() {
    fanout()
        .stdin("hello world\n")
        .args(&["-o", "echo {}"])
        .passes()
        .stdout_lines(&["hello world"]);
}

#[test]
fn blank_lines_are_dropped_by_default() {
    fanout()
        .stdin("a\n\n\nb\n")
        .args(&["-o", "echo {}"])
        .passes()
        .stdout_line_count(2);
}

#[test]
fn print_empty_keeps_blank_lines() {
    fanout()
        .stdin("a\n\nb\n")
        .args(&["-o", "-P", "echo {}"])
        .passes()
        .stdout_line_count(3)
        .stdout_has("a")
        .stdout_has("b");
}

#[test]
fn null_byte_splitting() {
    fanout()
        .stdin_bytes(b"a b\0c\0")
        .args(&["-o", "-0", "echo {}"])
        .passes()
        .stdout_lines(&["a b", "c"]);
}

#[test]
fn null_terminator_adds_no_blank_line_under_print_empty() {
    // The byte after the last NUL is framing, not an empty item.
    fanout()
        .stdin_bytes(b"a\0b\0")
        .args(&["-o", "-0", "-P", "echo {}"])
        .passes()
        .stdout_line_count(2);
}

#[test]
fn interior_null_chunks_stay_blank_under_print_empty() {
    fanout()
        .stdin_bytes(b"a\0\0b\0")
        .args(&["-o", "-0", "-P", "echo {}"])
        .passes()
        .stdout_line_count(3)
        .stdout_has("a")
        .stdout_has("b");
}

#[test]
fn stdin_items_feed_the_command_stdin_with_stdin_mode() {
    fanout()
        .stdin("hello\n")
        .args(&["-o", "-I", "cat"])
        .passes()
        .stdout_lines(&["hello"]);
}

#[test]
fn stdin_items_lead_and_argument_lists_follow() {
    fanout()
        .stdin("x\ny\n")
        .args(&["-o", "-a", "1 2", "echo {1}{2}"])
        .passes()
        .stdout_lines(&["x1", "y2"]);
}

#[test]
fn empty_stdin_falls_back_to_argument_lists() {
    fanout()
        .stdin("")
        .args(&["-d", "-o", "-a", "a b", "echo {}"])
        .passes()
        .stdout_lines(&["echo a", "echo b"]);
}
