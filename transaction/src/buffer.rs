//! Transaction buffer for tracking applied changes.

use inv_core::{ChangeEvent, RowId};
use inv_graph::Row;
use std::collections::HashSet;

/// One applied change and what it takes to undo it.
#[derive(Debug, Clone)]
pub enum UndoEntry {
    /// Row created in this transaction; undo takes it out.
    Created(RowId),
    /// Image of a row before its first change in this transaction.
    Changed(Row),
    /// Row removed in this transaction; undo puts it back.
    Removed(Row),
}

/// Undo log plus the events waiting for commit.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuffer {
    /// Applied changes in order.
    undo: Vec<UndoEntry>,
    /// Rows whose prior image is already logged.
    snapshotted: HashSet<RowId>,
    /// Rows created in this transaction.
    created: HashSet<RowId>,
    /// Events to deliver on commit.
    events: Vec<ChangeEvent>,
}

impl TransactionBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a row that was created.
    pub fn track_created(&mut self, id: RowId) {
        self.created.insert(id);
        self.undo.push(UndoEntry::Created(id));
    }

    /// Track the image of a row about to change.
    ///
    /// Only the first image per row is kept; rows created in this
    /// transaction need none.
    pub fn track_changed(&mut self, prior: &Row) {
        if self.created.contains(&prior.id) || !self.snapshotted.insert(prior.id) {
            return;
        }
        self.undo.push(UndoEntry::Changed(prior.clone()));
    }

    /// Track a row that was removed.
    pub fn track_removed(&mut self, row: Row) {
        self.undo.push(UndoEntry::Removed(row));
    }

    /// Check if a row was created in this transaction.
    pub fn is_created(&self, id: RowId) -> bool {
        self.created.contains(&id)
    }

    pub fn push_event(&mut self, event: ChangeEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    /// Take the undo log, newest first.
    pub fn drain_undo(&mut self) -> impl Iterator<Item = UndoEntry> {
        let mut undo = std::mem::take(&mut self.undo);
        undo.reverse();
        undo.into_iter()
    }

    /// Take the buffered events, in order.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of logged changes.
    pub fn change_count(&self) -> usize {
        self.undo.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.events.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.snapshotted.clear();
        self.created.clear();
        self.events.clear();
    }
}
