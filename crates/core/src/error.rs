// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for task sources and template resolution.

use thiserror::Error;

/// A task-source contract violation: a sequence index that does not exist
/// was read. This never occurs through the public batch surface and is
/// surfaced immediately rather than recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("sequence index {index} out of bounds for {count} sequences")]
pub struct BoundsError {
    /// The requested sequence index.
    pub index: usize,
    /// How many sequences are registered.
    pub count: usize,
}

/// Errors from resolving a command template against a batch.
///
/// Non-retryable: a template error fails the job it belongs to (or the whole
/// run under exit-on-error) and is never silently recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A numbered token referenced an input position beyond the batch.
    #[error("token {{{token}}} out of range for batch of {batch_len} items")]
    OutOfRange {
        /// The token body as written, e.g. `5` or `5/.`.
        token: String,
        /// Number of items in the batch.
        batch_len: usize,
    },

    /// A substituted value re-matches its own token pattern, which would
    /// loop forever if substitution were re-applied.
    #[error("substituted value for {{{token}}} re-matches a numbered token: {value:?}")]
    SelfReferential {
        /// The token body being replaced.
        token: String,
        /// The offending substituted value.
        value: String,
    },
}
