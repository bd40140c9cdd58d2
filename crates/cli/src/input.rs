// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expansion of `-a` argument lists into input sequences.
//!
//! Each list is whitespace-split; every token then expands as a numeric
//! range `{a..b}`, a glob pattern, or itself. Tokens that match nothing pass
//! through verbatim, so plain words and numbers need no quoting.

use fanout_core::{Sequence, TaskSet};
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A `{a..b}` range with a start past its end.
    #[error("range {token} has start {start} > end {end}")]
    ReversedRange { token: String, start: u64, end: u64 },
}

/// Build the run's task set: one sequence per `-a` list, in flag order.
pub fn build_task_set(lists: &[String], shuffle: bool) -> Result<TaskSet, InputError> {
    let mut set = TaskSet::new();
    for list in lists {
        set.register(expand_list(list, shuffle)?);
    }
    Ok(set)
}

/// Expand one `-a` list into a sequence.
pub fn expand_list(list: &str, shuffle: bool) -> Result<Sequence, InputError> {
    let mut items = Vec::new();
    for token in list.split_whitespace() {
        items.extend(expand_token(token)?);
    }
    if shuffle {
        items.shuffle(&mut rand::thread_rng());
    }
    Ok(Sequence::from_items(items))
}

fn expand_token(token: &str) -> Result<Vec<String>, InputError> {
    if let Some((start, end)) = parse_range(token) {
        if start > end {
            return Err(InputError::ReversedRange { token: token.to_string(), start, end });
        }
        return Ok((start..=end).map(|n| n.to_string()).collect());
    }
    Ok(glob_expand(token))
}

/// `{a..b}` with both endpoints numeric; anything else is not a range.
fn parse_range(token: &str) -> Option<(u64, u64)> {
    let body = token.strip_prefix('{')?.strip_suffix('}')?;
    let (start, end) = body.split_once("..")?;
    let numeric =
        |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !numeric(start) || !numeric(end) {
        return None;
    }
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Glob expansion keeping only non-directory matches. A token that is not a
/// valid pattern, or matches nothing, passes through verbatim.
fn glob_expand(token: &str) -> Vec<String> {
    let Ok(paths) = glob::glob(token) else {
        return vec![token.to_string()];
    };
    let files: Vec<String> = paths
        .flatten()
        .filter(|path| !path.is_dir())
        .map(|path| path.display().to_string())
        .collect();
    if files.is_empty() {
        vec![token.to_string()]
    } else {
        files
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
