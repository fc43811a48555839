//! Document model: strokes and the store that owns them.
//!
//! `DocStore` holds the committed strokes in draw order together with the
//! undo/redo [`History`]. Strokes enter and leave the document only through
//! `commit_stroke`, `clear`, `undo` and `redo`, so the document is always
//! reproducible from the log.
//!
//! `clear` is undoable: it snapshots the strokes into a `Clear` entry and
//! leaves the rest of the history (and the camera) alone.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MIN_STROKE_POINTS;
use crate::geometry::Point;
use crate::history::{History, HistoryEntry};

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// A freehand stroke: world-space points in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Unique identifier for this stroke.
    pub id: StrokeId,
    /// World-space samples, oldest first.
    pub points: Vec<Point>,
    /// Host timestamp of the contact that started the stroke, in milliseconds.
    pub created_at_ms: f64,
}

impl Stroke {
    /// Start a stroke at `origin`.
    #[must_use]
    pub fn begin(origin: Point, created_at_ms: f64) -> Self {
        Self { id: Uuid::new_v4(), points: vec![origin], created_at_ms }
    }

    /// Append a sample.
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Whether the stroke has enough points to be kept.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        self.points.len() >= MIN_STROKE_POINTS
    }
}

/// Snapshot of undo/redo availability for the UI control surface.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_clear: bool,
    pub can_share: bool,
}

/// Committed strokes plus their undo/redo log.
#[derive(Debug, Clone)]
pub struct DocStore {
    strokes: Vec<Stroke>,
    history: History,
}

impl DocStore {
    /// An empty store whose history keeps at most `history_cap` entries.
    #[must_use]
    pub fn new(history_cap: usize) -> Self {
        Self { strokes: Vec::new(), history: History::new(history_cap) }
    }

    /// Commit a finished stroke. Strokes with fewer than two points are
    /// dropped. Returns `true` if the stroke was added.
    pub fn commit_stroke(&mut self, stroke: Stroke) -> bool {
        if !stroke.is_committable() {
            return false;
        }
        self.strokes.push(stroke.clone());
        self.history.record(HistoryEntry::AddStroke(stroke));
        true
    }

    /// Remove every stroke as a single undoable step. No-op when empty.
    pub fn clear(&mut self) -> bool {
        if self.strokes.is_empty() {
            return false;
        }
        let snapshot = std::mem::take(&mut self.strokes);
        self.history.record(HistoryEntry::Clear(snapshot));
        true
    }

    /// Revert the most recent applied entry. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.step_back() {
            Some(HistoryEntry::AddStroke(_)) => {
                self.strokes.pop();
                true
            }
            Some(HistoryEntry::Clear(snapshot)) => {
                self.strokes.clone_from(snapshot);
                true
            }
            None => false,
        }
    }

    /// Re-apply the next undone entry. Returns `false` if there is none.
    pub fn redo(&mut self) -> bool {
        match self.history.step_forward() {
            Some(HistoryEntry::AddStroke(stroke)) => {
                self.strokes.push(stroke.clone());
                true
            }
            Some(HistoryEntry::Clear(_)) => {
                self.strokes.clear();
                true
            }
            None => false,
        }
    }

    /// Committed strokes in draw order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of committed strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Returns `true` if the document contains no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Undo/redo/clear/share availability.
    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            can_clear: !self.strokes.is_empty(),
            can_share: !self.strokes.is_empty(),
        }
    }
}
