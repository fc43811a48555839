//! Bounded undo/redo log.
//!
//! The log is a list of reversible entries plus a cursor. Entries before the
//! cursor are applied; entries at or after it are redoable. Recording a new
//! entry drops the redo tail. When the log outgrows its cap the oldest entry
//! is evicted and the cursor shifts with it.
//!
//! This type only moves the cursor. Applying an entry to the strokes is the
//! job of [`crate::doc::DocStore`].

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::doc::Stroke;

/// A reversible change to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A stroke was appended.
    AddStroke(Stroke),
    /// The document was cleared; holds the strokes present before clearing.
    Clear(Vec<Stroke>),
}

/// The undo/redo log.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    /// Number of applied entries, `0..=entries.len()`.
    applied: usize,
    cap: usize,
}

impl History {
    /// An empty log holding at most `cap` entries (minimum 1).
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self { entries: VecDeque::new(), applied: 0, cap: cap.max(1) }
    }

    /// Append an entry after the cursor, discarding any redo tail.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.applied);
        self.entries.push_back(entry);
        self.applied += 1;

        while self.entries.len() > self.cap {
            self.entries.pop_front();
            self.applied -= 1;
        }
    }

    /// Move the cursor back one entry and return the entry to revert.
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.entries.get(self.applied)
    }

    /// Move the cursor forward one entry and return the entry to re-apply.
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        if self.applied >= self.entries.len() {
            return None;
        }
        self.applied += 1;
        self.entries.get(self.applied - 1)
    }

    /// Index of the most recently applied entry, or `None` when nothing is applied.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }
}
