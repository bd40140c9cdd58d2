// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fanout_core::template::Rendered;

#[test]
fn job_carries_rendered_command_and_slot() {
    let rendered = Rendered { command: "echo a".to_string(), is_empty: false };
    let job = Job::new(rendered, vec!["a".to_string()], 4, 3);
    assert_eq!(job.command, "echo a");
    assert!(!job.is_empty);
    assert_eq!(job.sequence, 4);
    assert_eq!(job.slot, 2);
    assert_eq!(job.batch, vec!["a".to_string()]);
}

#[test]
fn state_machine_terminal_states() {
    assert!(!JobState::Pending.is_terminal());
    assert!(!JobState::Admitted.is_terminal());
    assert!(!JobState::Running.is_terminal());
    assert!(JobState::Succeeded.is_terminal());
    assert!(JobState::Failed.is_terminal());
}

#[test]
fn state_display() {
    assert_eq!(JobState::Pending.to_string(), "pending");
    assert_eq!(JobState::Running.to_string(), "running");
    assert_eq!(JobState::Failed.to_string(), "failed");
}
