// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fanout-core: input sequences and command-template resolution for the
//! fanout job dispatcher.
//!
//! This crate is the synchronous heart of fanout: circular input
//! [`Sequence`]s grouped into a [`TaskSet`], and the placeholder resolver in
//! [`template`] that turns one batch of items into a shell-ready command
//! line. Everything async (admission control, process spawning, output
//! sequencing) lives in `fanout-engine`.

pub mod error;
pub mod source;
pub mod template;

pub use error::{BoundsError, TemplateError};
pub use source::{Batch, Item, Sequence, SequenceCounter, TaskSet};
pub use template::{resolve, resolve_without_defaults, shell_quote, slot_number, Rendered};
