// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized writes to the process standard streams.
//!
//! Guarantees: no torn interleaving between concurrent jobs (one mutex-held
//! write per job), trailing whitespace trimmed, empty text dropped unless
//! print-empty was requested, and, under keep-order, writes flushed in
//! ticket (submission) order regardless of completion order.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// Which process stream a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Destination for serialized writes. The production sink is the process's
/// own stdio; tests capture into a buffer.
pub trait OutputSink: Send + Sync + 'static {
    fn write_line(&self, stream: Stream, text: &str);
}

/// Sink over the real process streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl OutputSink for StdioSink {
    fn write_line(&self, stream: Stream, text: &str) {
        // Failures to write stdio are unreportable; drop them.
        match stream {
            Stream::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{text}");
            }
            Stream::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = writeln!(err, "{text}");
            }
        }
    }
}

/// Serializes job output onto a sink.
///
/// Each run constructs its own sequencer; the ticket counter, turn counter,
/// and write lock are the only state shared between job tasks.
pub struct OutputSequencer {
    sink: Box<dyn OutputSink>,
    keep_order: bool,
    print_empty: bool,
    write_lock: Mutex<()>,
    issued: AtomicU64,
    next: AtomicU64,
    turn: Notify,
}

impl OutputSequencer {
    pub fn new(sink: impl OutputSink, keep_order: bool, print_empty: bool) -> Self {
        Self {
            sink: Box::new(sink),
            keep_order,
            print_empty,
            write_lock: Mutex::new(()),
            issued: AtomicU64::new(0),
            next: AtomicU64::new(0),
            turn: Notify::new(),
        }
    }

    /// Issue the next write ticket. Tickets are taken in submission order;
    /// under keep-order every ticket must eventually be flushed or later
    /// tickets wait forever.
    pub fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst)
    }

    /// Immediate serialized write, no ordering ticket. Trailing whitespace
    /// is trimmed; empty text is a no-op unless print-empty is set.
    pub fn write(&self, stream: Stream, text: &str) {
        self.emit(&[(stream, text)]);
    }

    /// Flush a job's writes at its ticket turn.
    ///
    /// Without keep-order this writes immediately. With keep-order it waits
    /// until every earlier ticket has flushed, writes, then releases the
    /// next ticket; a later-finishing job blocks here, not in the executor.
    pub async fn flush(&self, ticket: u64, entries: &[(Stream, &str)]) {
        if !self.keep_order {
            self.emit(entries);
            return;
        }
        loop {
            let turn = self.turn.notified();
            if self.next.load(Ordering::SeqCst) == ticket {
                break;
            }
            turn.await;
        }
        self.emit(entries);
        self.next.fetch_add(1, Ordering::SeqCst);
        self.turn.notify_waiters();
    }

    fn emit(&self, entries: &[(Stream, &str)]) {
        let _guard = self.write_lock.lock();
        for (stream, text) in entries {
            let trimmed = text.trim_end();
            if trimmed.is_empty() && !self.print_empty {
                continue;
            }
            self.sink.write_line(*stream, trimmed);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
mod buffer {
    use super::{OutputSink, Stream};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Capturing sink for tests.
    #[derive(Clone, Default)]
    pub struct BufferSink {
        lines: Arc<Mutex<Vec<(Stream, String)>>>,
    }

    impl BufferSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// All captured lines in write order.
        pub fn lines(&self) -> Vec<(Stream, String)> {
            self.lines.lock().clone()
        }

        /// Captured stdout lines only.
        pub fn stdout(&self) -> Vec<String> {
            self.lines
                .lock()
                .iter()
                .filter(|(stream, _)| *stream == Stream::Stdout)
                .map(|(_, line)| line.clone())
                .collect()
        }

        /// Captured stderr lines only.
        pub fn stderr(&self) -> Vec<String> {
            self.lines
                .lock()
                .iter()
                .filter(|(stream, _)| *stream == Stream::Stderr)
                .map(|(_, line)| line.clone())
                .collect()
        }
    }

    impl OutputSink for BufferSink {
        fn write_line(&self, stream: Stream, text: &str) {
            self.lines.lock().push((stream, text.to_string()));
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use buffer::BufferSink;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
