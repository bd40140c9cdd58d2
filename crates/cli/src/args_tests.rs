// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::CommandFactory;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["fanout"]).unwrap();
    assert_eq!(cli.template, None);
    assert!(cli.arguments.is_empty());
    assert_eq!(cli.slots, 8);
    assert!(!cli.dry_run);
    assert!(!cli.ordered);
    assert!(!cli.keep_order);
    assert!(!cli.null);
}

#[test]
fn template_and_repeated_argument_lists() {
    let cli =
        Cli::try_parse_from(["fanout", "-a", "1 2 3", "-a", "x y", "echo {1} {2}"]).unwrap();
    assert_eq!(cli.template.as_deref(), Some("echo {1} {2}"));
    assert_eq!(cli.arguments, vec!["1 2 3", "x y"]);
}

#[test]
fn short_flags() {
    let cli = Cli::try_parse_from([
        "fanout", "-d", "-o", "-k", "-P", "-E", "-I", "-0", "-S", "-s", "4", "-A", "{print $1}",
        "true",
    ])
    .unwrap();
    assert!(cli.dry_run);
    assert!(cli.ordered);
    assert!(cli.keep_order);
    assert!(cli.print_empty);
    assert!(cli.exit_on_error);
    assert!(cli.stdin);
    assert!(cli.null);
    assert!(cli.shuffle);
    assert_eq!(cli.slots, 4);
    assert_eq!(cli.awk.as_deref(), Some("{print $1}"));
}

#[test]
fn long_flags() {
    let cli = Cli::try_parse_from([
        "fanout",
        "--arguments",
        "a b",
        "--slots",
        "2",
        "--keep-order",
        "--exit-on-error",
        "echo {}",
    ])
    .unwrap();
    assert_eq!(cli.arguments, vec!["a b"]);
    assert_eq!(cli.slots, 2);
    assert!(cli.keep_order);
    assert!(cli.exit_on_error);
}
