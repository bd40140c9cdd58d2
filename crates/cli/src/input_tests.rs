// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn items(sequence: &Sequence) -> Vec<String> {
    sequence.items().to_vec()
}

#[parameterized(
    three = { "{1..3}", &["1", "2", "3"] },
    single = { "{3..3}", &["3"] },
    wide = { "{8..11}", &["8", "9", "10", "11"] },
)]
fn numeric_ranges_expand_inclusively(token: &str, expected: &[&str]) {
    let sequence = expand_list(token, false).unwrap();
    assert_eq!(items(&sequence), expected);
}

#[parameterized(
    letters = { "{a..b}" },
    missing_end = { "{1..}" },
    no_dots = { "{12}" },
    bare_word = { "alpha" },
    number = { "42" },
)]
fn non_range_tokens_pass_through_verbatim(token: &str) {
    let sequence = expand_list(token, false).unwrap();
    assert_eq!(items(&sequence), vec![token.to_string()]);
}

#[test]
fn reversed_range_is_an_error() {
    let err = expand_list("{5..2}", false).unwrap_err();
    assert_eq!(
        err,
        InputError::ReversedRange { token: "{5..2}".to_string(), start: 5, end: 2 }
    );
}

#[test]
fn lists_split_on_whitespace_and_expand_per_token() {
    let sequence = expand_list("a  {1..2}\tz", false).unwrap();
    assert_eq!(items(&sequence), vec!["a", "1", "2", "z"]);
}

#[test]
fn globs_expand_to_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.txt"), "").unwrap();
    std::fs::write(dir.path().join("two.txt"), "").unwrap();
    std::fs::create_dir(dir.path().join("dir.txt")).unwrap();

    let pattern = format!("{}/*.txt", dir.path().display());
    let sequence = expand_list(&pattern, false).unwrap();
    let found = items(&sequence);

    // Directories never match; glob yields sorted paths.
    assert_eq!(found.len(), 2);
    assert!(found[0].ends_with("one.txt"));
    assert!(found[1].ends_with("two.txt"));
}

#[test]
fn non_matching_glob_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.none", dir.path().display());
    let sequence = expand_list(&pattern, false).unwrap();
    assert_eq!(items(&sequence), vec![pattern]);
}

#[test]
fn shuffle_preserves_the_item_set() {
    let shuffled = expand_list("{1..50}", true).unwrap();
    let plain = expand_list("{1..50}", false).unwrap();
    let mut sorted = items(&shuffled);
    sorted.sort();
    let mut expected = items(&plain);
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn task_set_registers_one_sequence_per_list() {
    let set =
        build_task_set(&["a b".to_string(), "{1..3}".to_string()], false).unwrap();
    assert_eq!(set.sequences().len(), 2);
    assert_eq!(set.max(), 3);
}

#[test]
fn empty_list_of_lists_builds_an_empty_set() {
    let set = build_task_set(&[], false).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.max(), 0);
}
