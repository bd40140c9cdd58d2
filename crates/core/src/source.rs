// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circular input sequences and the batch-producing task set.
//!
//! A [`Sequence`] is an ordered list of input items with a wrapping cursor:
//! reading past the end restarts at the beginning, so a short list can feed
//! as many jobs as the longest one. A [`TaskSet`] groups sequences in
//! registration order and produces one item per sequence per batch.

use crate::error::BoundsError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One opaque input token: a line of text, a filename, a literal argument.
pub type Item = String;

/// One item drawn from each registered sequence, in registration order.
pub type Batch = Vec<Item>;

/// An ordered, circularly-wrapping list of input items.
///
/// Invariant: `cursor < items.len()` whenever the sequence is non-empty.
/// An empty sequence is never advanced and yields no item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    items: Vec<Item>,
    cursor: usize,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { items: items.into_iter().map(Into::into).collect(), cursor: 0 }
    }

    /// Append items to the sequence. Construction-time only; the dispatcher
    /// owns the sequence exclusively once a run starts.
    pub fn add<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// True when the cursor sits on the last item, i.e. the next read
    /// consumes the final pre-wrap position.
    fn at_final_position(&self) -> bool {
        !self.items.is_empty() && self.cursor == self.items.len() - 1
    }

    /// Read the item at the cursor and advance, wrapping to the start after
    /// the last item. Returns `None` for an empty sequence.
    fn next(&mut self) -> Option<Item> {
        let item = self.items.get(self.cursor)?.clone();
        self.cursor = if self.cursor + 1 >= self.items.len() { 0 } else { self.cursor + 1 };
        Some(item)
    }
}

/// Shared, monotonically increasing job sequence counter.
///
/// Starts at 1. The dispatcher increments it once per dispatched job, not
/// once per batch produced: a streaming-stdin caller builds ad hoc batches
/// with no registered sequence for the stdin item and drives the counter
/// itself. Cloning hands out another handle to the same counter, so each run
/// constructs its own instance and independent runs never interfere.
#[derive(Debug, Clone)]
pub struct SequenceCounter(Arc<AtomicU64>);

impl SequenceCounter {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(1)))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Reset to the starting value. Only used between independent runs
    /// (and tests); never during a run.
    pub fn reset(&self) {
        self.0.store(1, Ordering::SeqCst);
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A registration-ordered collection of sequences plus the shared job
/// sequence counter.
///
/// Owned exclusively by the run coordinator: batch production is strictly
/// sequential, which is what keeps sequence numbers monotonic and
/// deterministic.
#[derive(Debug, Default)]
pub struct TaskSet {
    sequences: Vec<Sequence>,
    counter: SequenceCounter,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sequence. Registration order is batch order.
    pub fn register(&mut self, sequence: Sequence) {
        self.sequences.push(sequence);
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Length of the longest registered sequence; 0 when all are empty.
    ///
    /// This is the total number of batches a materialized run produces.
    pub fn max(&self) -> usize {
        self.sequences.iter().map(Sequence::len).max().unwrap_or(0)
    }

    /// Read and advance the sequence at `index`.
    ///
    /// Returns the item (`None` for an empty sequence) and whether this read
    /// consumed the final pre-wrap position of a longest sequence.
    /// Defensive surface: `next_batch` only ever passes valid indices.
    pub fn next_at(&mut self, index: usize) -> Result<(Option<Item>, bool), BoundsError> {
        let max = self.max();
        let count = self.sequences.len();
        let sequence = self
            .sequences
            .get_mut(index)
            .ok_or(BoundsError { index, count })?;
        let at_end = sequence.len() == max && sequence.at_final_position();
        Ok((sequence.next(), at_end))
    }

    /// Produce the next batch: one item per non-empty sequence, in
    /// registration order. Shorter sequences wrap silently; `at_end` is set
    /// once the longest sequence has completed one full lap.
    pub fn next_batch(&mut self) -> Result<(Batch, bool), BoundsError> {
        let mut batch = Vec::with_capacity(self.sequences.len());
        let mut at_end = false;
        for index in 0..self.sequences.len() {
            let (item, end) = self.next_at(index)?;
            if let Some(item) = item {
                batch.push(item);
            }
            at_end = at_end || end;
        }
        Ok((batch, at_end))
    }

    /// Current job sequence number.
    pub fn sequence(&self) -> u64 {
        self.counter.get()
    }

    /// Increment the job sequence number. Called once per dispatched job.
    pub fn increment_sequence(&self) {
        self.counter.increment();
    }

    /// Reset the job sequence number between independent runs.
    pub fn reset_sequence(&self) {
        self.counter.reset();
    }

    /// A shared handle to the sequence counter for callers that drive it
    /// outside the materialized batch loop (streaming stdin).
    pub fn counter(&self) -> SequenceCounter {
        self.counter.clone()
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
