//! Undo scopes, entries, and the bounded undo stack.
//!
//! Scopes coalesce: an editor operation opens a scope, and operations it
//! performs internally open nested scopes that contribute to the outermost
//! one instead of producing entries of their own. One user gesture, one
//! undo entry, however many writes it took.

use std::collections::VecDeque;

use behavior_store::{ActorId, Brain};

use crate::editor::BrainEditor;
use crate::error::EditError;
use crate::host::ScriptingHost;

/// An open undo scope. Issued by
/// [`BrainEditor::start_undo`](crate::editor::BrainEditor::start_undo) and
/// consumed by `end_undo`; holding one is the only way to close a scope, so
/// begin/end calls cannot drift out of balance.
///
/// `before` is captured only by the outermost scope. Inner scopes carry
/// nothing.
#[must_use = "an undo scope must be closed with end_undo"]
#[derive(Debug)]
pub struct UndoScope {
    pub(crate) label: String,
    pub(crate) before: Option<Brain>,
}

/// One undoable edit: full before/after snapshots of a brain's content.
///
/// Snapshots are content-only. The brain ID is resolved from the actor at
/// replay time, so a copy-on-write clone that happened during the edit is
/// never itself undone - undo restores the old content into the actor's
/// current brain.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    label: String,
    actor_id: ActorId,
    before: Brain,
    after: Brain,
    replayed: bool,
}

impl UndoEntry {
    pub fn new(label: impl Into<String>, actor_id: ActorId, before: Brain, after: Brain) -> Self {
        Self {
            label: label.into(),
            actor_id,
            before,
            after,
            replayed: false,
        }
    }

    /// Human-readable description of the edit ("Set speed", ...).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write the after-snapshot into the actor's brain, through the
    /// editor's authorization and copy-on-write guard.
    ///
    /// The first application happens as the edit completes, when the brain
    /// already holds this content; only later applications (redo) replace
    /// live content and trigger a replay notification.
    pub fn apply(&mut self, host: &mut ScriptingHost) -> Result<(), EditError> {
        BrainEditor::new(self.actor_id).set_brain(host, self.after.clone())?;
        if self.replayed {
            host.actors.notify_brain_replayed(self.actor_id);
        } else {
            self.replayed = true;
        }
        Ok(())
    }

    /// Write the before-snapshot into the actor's brain. Always a replay.
    pub fn revert(&self, host: &mut ScriptingHost) -> Result<(), EditError> {
        BrainEditor::new(self.actor_id).set_brain(host, self.before.clone())?;
        host.actors.notify_brain_replayed(self.actor_id);
        Ok(())
    }
}

/// How many edits [`UndoStack::new`] keeps before discarding the oldest.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// A bounded undo/redo stack.
#[derive(Debug)]
pub struct UndoStack {
    undo: VecDeque<UndoEntry>,
    redo: VecDeque<UndoEntry>,
    max_entries: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_entries,
        }
    }

    /// Record a completed edit. Clears the redo side and discards the
    /// oldest edits beyond the capacity.
    pub fn push(&mut self, entry: UndoEntry) {
        self.redo.clear();
        self.undo.push_back(entry);
        while self.undo.len() > self.max_entries {
            self.undo.pop_front();
        }
    }

    /// Revert the most recent edit. `Ok(false)` when there is nothing to
    /// undo.
    ///
    /// An entry whose actor no longer exists can never replay; it is
    /// dropped rather than re-queued.
    pub fn undo(&mut self, host: &mut ScriptingHost) -> Result<bool, EditError> {
        let Some(entry) = self.undo.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = entry.revert(host) {
            if host.actors.brain_for_actor(entry.actor_id).is_some() {
                self.undo.push_back(entry);
            }
            return Err(err);
        }
        self.redo.push_back(entry);
        Ok(true)
    }

    /// Re-apply the most recently undone edit. `Ok(false)` when there is
    /// nothing to redo. Entries for vanished actors are dropped, as in
    /// [`undo`](Self::undo).
    pub fn redo(&mut self, host: &mut ScriptingHost) -> Result<bool, EditError> {
        let Some(mut entry) = self.redo.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = entry.apply(host) {
            if host.actors.brain_for_actor(entry.actor_id).is_some() {
                self.redo.push_back(entry);
            }
            return Err(err);
        }
        self.undo.push_back(entry);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undoable entries currently held.
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
