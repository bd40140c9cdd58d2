// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder resolution: expand a command template against one batch.
//!
//! Recognized tokens, each usable zero or more times:
//!
//! | token    | meaning                                      |
//! |----------|----------------------------------------------|
//! | `{}`     | first batch item, verbatim                   |
//! | `{.}`    | first item, extension stripped               |
//! | `{/}`    | first item, basename                         |
//! | `{//}`   | first item, dirname                          |
//! | `{/.}`   | first item, basename without extension       |
//! | `{n}` …  | the same five transforms over the n-th item  |
//! | `{#}`    | job sequence number                          |
//! | `{%}`    | job slot number                              |
//!
//! Resolution is a pure function: no shared state, identical output for
//! identical input.

use crate::error::TemplateError;
use crate::source::Item;
use std::path::Path;

/// A resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The expanded, shell-ready command string.
    pub command: String,
    /// True when no shell process should be spawned: the template was blank
    /// or contained nothing but placeholders (pass-through echo mode).
    pub is_empty: bool,
}

/// The five path transforms shared by plain and numbered tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathTransform {
    Verbatim,
    NoExtension,
    Basename,
    Dirname,
    BasenameNoExtension,
}

/// Token-suffix table: `{}` / `{n}`, `{.}` / `{n.}`, and so on. One row per
/// token kind instead of bespoke code per token.
const TRANSFORMS: [(&str, PathTransform); 5] = [
    ("", PathTransform::Verbatim),
    (".", PathTransform::NoExtension),
    ("/", PathTransform::Basename),
    ("//", PathTransform::Dirname),
    ("/.", PathTransform::BasenameNoExtension),
];

impl PathTransform {
    fn apply(self, value: &str) -> String {
        match self {
            PathTransform::Verbatim => value.to_string(),
            PathTransform::NoExtension => strip_extension(value),
            PathTransform::Basename => basename(value),
            PathTransform::Dirname => dirname(value),
            PathTransform::BasenameNoExtension => strip_extension(&basename(value)),
        }
    }
}

/// Basename of a path; the input itself when there is no file component.
fn basename(value: &str) -> String {
    Path::new(value)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| value.to_string())
}

/// Dirname of a path; `.` when there is no directory component.
fn dirname(value: &str) -> String {
    match Path::new(value).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.to_string_lossy().into_owned()
        }
        _ => ".".to_string(),
    }
}

/// Strip the final extension, keeping any directory component.
fn strip_extension(value: &str) -> String {
    let path = Path::new(value);
    match path.extension() {
        Some(_) => path.with_extension("").to_string_lossy().into_owned(),
        None => value.to_string(),
    }
}

/// Derive the slot (worker identity) number in `[1, width]` for a job.
///
/// The first `width` jobs take their own sequence number; later jobs wrap
/// round-robin: `seq % width + 1`.
pub fn slot_number(sequence: u64, width: usize) -> u64 {
    let width = width.max(1) as u64;
    if sequence <= width {
        sequence
    } else {
        sequence % width + 1
    }
}

/// Quote a value for safe inclusion in a shell command line.
///
/// Quoting, not validation: any byte sequence survives, it just cannot be
/// re-parsed as nested shell syntax. Values made only of unambiguous
/// characters pass through unquoted.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | '/' | ':' | '=' | '@' | '%' | '+' | ',')
        });
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

/// Expand `template` against `batch` for the job with sequence number
/// `sequence_no` under a concurrency width of `width` slots.
///
/// `shell_escape` controls whether substituted item values are quoted;
/// pass-through (empty) commands always substitute raw values since their
/// text is never re-parsed by a shell.
pub fn resolve(
    template: &str,
    batch: &[Item],
    sequence_no: u64,
    width: usize,
    shell_escape: bool,
) -> Result<Rendered, TemplateError> {
    resolve_impl(template, batch, sequence_no, width, shell_escape, true)
}

/// Like [`resolve`], but never synthesizes default trailing tokens for a
/// bare command. Used when the batch item is delivered to the child's stdin
/// rather than its command line; explicit tokens still substitute.
pub fn resolve_without_defaults(
    template: &str,
    batch: &[Item],
    sequence_no: u64,
    width: usize,
    shell_escape: bool,
) -> Result<Rendered, TemplateError> {
    resolve_impl(template, batch, sequence_no, width, shell_escape, false)
}

fn resolve_impl(
    template: &str,
    batch: &[Item],
    sequence_no: u64,
    width: usize,
    shell_escape: bool,
    inject_defaults: bool,
) -> Result<Rendered, TemplateError> {
    if template.trim().is_empty() {
        return Ok(Rendered { command: String::new(), is_empty: true });
    }

    let mut command = template.to_string();

    // A bare command with no positional tokens is still parameterized by its
    // inputs: synthesize trailing tokens. `{#}` and `{%}` alone do not count.
    if inject_defaults && !batch.is_empty() && !has_positional_token(&command) {
        command.push(' ');
        command.push_str(&default_tokens(batch.len()));
    }

    // Pass-through mode: nothing left once every token is removed.
    let is_empty = strip_tokens(&command).trim().is_empty();
    let escape = shell_escape && !is_empty;

    // Plain tokens draw from the first batch item.
    if let Some(first) = batch.first() {
        for (suffix, transform) in TRANSFORMS {
            let token = format!("{{{suffix}}}");
            if command.contains(&token) {
                let value = transform.apply(first);
                let value = if escape { shell_quote(&value) } else { value };
                command = command.replace(&token, &value);
            }
        }
    }

    // Numbered tokens are 1-indexed into the batch.
    for (suffix, transform) in TRANSFORMS {
        for (number, token) in find_numbered(&command, suffix) {
            let body = &token[1..token.len() - 1];
            let item = if number >= 1 { batch.get(number - 1) } else { None };
            let item = item.ok_or_else(|| TemplateError::OutOfRange {
                token: body.to_string(),
                batch_len: batch.len(),
            })?;
            let value = transform.apply(item);
            if contains_numbered(&value, suffix) {
                return Err(TemplateError::SelfReferential {
                    token: body.to_string(),
                    value,
                });
            }
            let value = if escape { shell_quote(&value) } else { value };
            command = command.replace(&token, &value);
        }
    }

    // Sequence and slot numbers go last so their digits can never be picked
    // up by a positional-token scan.
    command = command.replace("{#}", &sequence_no.to_string());
    command = command.replace("{%}", &slot_number(sequence_no, width).to_string());

    Ok(Rendered { command, is_empty })
}

/// Default trailing tokens for a bare command: `{}` for a single-item batch,
/// `{1} {2} … {k}` otherwise.
fn default_tokens(batch_len: usize) -> String {
    if batch_len <= 1 {
        "{}".to_string()
    } else {
        let mut tokens = Vec::with_capacity(batch_len);
        for n in 1..=batch_len {
            tokens.push(format!("{{{n}}}"));
        }
        tokens.join(" ")
    }
}

/// Does the command contain any positional token (plain or numbered)?
fn has_positional_token(command: &str) -> bool {
    TRANSFORMS.iter().any(|(suffix, _)| {
        command.contains(&format!("{{{suffix}}}")) || !find_numbered(command, suffix).is_empty()
    })
}

/// Find every distinct numbered token `{<digits><suffix>}` in the command.
fn find_numbered(command: &str, suffix: &str) -> Vec<(usize, String)> {
    let bytes = command.as_bytes();
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        let digits_start = i + 1;
        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start {
            i += 1;
            continue;
        }
        let rest = &command[j..];
        if rest.starts_with(suffix) && rest[suffix.len()..].starts_with('}') {
            let end = j + suffix.len() + 1;
            let token = command[i..end].to_string();
            if let Ok(number) = command[digits_start..j].parse::<usize>() {
                if !found.iter().any(|(_, t)| *t == token) {
                    found.push((number, token));
                }
            }
            i = end;
        } else {
            i += 1;
        }
    }
    found
}

/// Does a value re-match the numbered token pattern for this suffix?
fn contains_numbered(value: &str, suffix: &str) -> bool {
    !find_numbered(value, suffix).is_empty()
}

/// Remove every recognized token from the command (for emptiness detection).
fn strip_tokens(command: &str) -> String {
    let mut stripped = command.to_string();
    for (suffix, _) in TRANSFORMS {
        stripped = stripped.replace(&format!("{{{suffix}}}"), "");
        for (_, token) in find_numbered(&stripped, suffix) {
            stripped = stripped.replace(&token, "");
        }
    }
    stripped = stripped.replace("{#}", "");
    stripped.replace("{%}", "")
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
