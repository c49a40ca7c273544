//! Bounded undo/redo history of parameter snapshots.

use crate::params::ParameterSet;
use std::time::Instant;

/// Maximum number of retained snapshots, oldest evicted first.
const CAPACITY: usize = 50;

/// One retained edit: the snapshot and when it landed.
#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry {
    /// The full parameter set after the edit.
    pub params: ParameterSet,
    /// When the edit was recorded.
    pub at: Instant,
}

/// Undo/redo history with a cursor into a bounded snapshot list.
///
/// The history always holds at least one entry: the state it was seeded
/// with. Pushing while the cursor sits mid-list discards the redo tail.
/// When the list overflows, the oldest entry is evicted and the cursor
/// stays put, so deep undo chains shorten from the far end.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl EditHistory {
    /// Start a history seeded with the current state.
    pub fn new(initial: ParameterSet) -> Self {
        Self {
            entries: vec![HistoryEntry {
                params: initial,
                at: Instant::now(),
            }],
            cursor: 0,
        }
    }

    /// Record a new snapshot, discarding any redo tail.
    pub fn push(&mut self, snapshot: ParameterSet) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            params: snapshot,
            at: Instant::now(),
        });
        if self.entries.len() > CAPACITY {
            self.entries.remove(0);
        } else {
            self.cursor += 1;
        }
    }

    /// Step back one edit, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<ParameterSet> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].params)
    }

    /// Step forward one edit, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<ParameterSet> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].params)
    }

    /// True when an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True when a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of retained snapshots, including the seed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the seed entry never leaves.
    pub fn is_empty(&self) -> bool {
        false
    }
}
