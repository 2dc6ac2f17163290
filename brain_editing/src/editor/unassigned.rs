//! Handle to a behavior not (yet) attached to any brain.

use behavior_store::{Behavior, BehaviorId, BehaviorUri, PropDef, StoreError};

use crate::error::EditError;
use crate::host::ScriptingHost;

/// A behavior considered on its own - in a card palette, in the source
/// editor - independent of any use of it.
///
/// Wraps a URI, so the handle can point into any of the three address
/// spaces. Only embedded behaviors are writable; builtins and library files
/// must be copied ([`make_copy`](Self::make_copy)) before editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignedBehavior {
    uri: BehaviorUri,
}

impl UnassignedBehavior {
    pub fn new(uri: BehaviorUri) -> Self {
        Self { uri }
    }

    pub fn uri(&self) -> &BehaviorUri {
        &self.uri
    }

    /// The embedded behavior ID, if this is an embedded behavior.
    pub fn behavior_id(&self) -> Option<BehaviorId> {
        self.uri.behavior_id()
    }

    /// Builtins ship with the runtime and cannot be edited in place.
    pub fn is_read_only(&self) -> bool {
        !self.uri.is_embedded()
    }

    /// The behavior's content.
    pub fn behavior(&self, host: &ScriptingHost) -> Result<Behavior, EditError> {
        Ok(self.resolve_anywhere(host)?)
    }

    /// All property declarations of the behavior.
    pub fn prop_defs(&self, host: &ScriptingHost) -> Result<Vec<PropDef>, EditError> {
        Ok(host.behavior_prop_defs(&self.uri)?)
    }

    /// Commit new source, clearing any pending draft. Only embedded
    /// behaviors can be written; committing unchanged source over a clean
    /// behavior is a no-op.
    pub fn commit_source(
        &self,
        host: &mut ScriptingHost,
        source: impl Into<String>,
    ) -> Result<(), EditError> {
        let source = source.into();
        let behavior = self.writable(host)?;
        if behavior.source == source && behavior.draft_source.is_none() {
            return Ok(());
        }
        behavior.source = source;
        behavior.draft_source = None;
        Ok(())
    }

    /// Stash work-in-progress source without committing it.
    pub fn set_draft_source(
        &self,
        host: &mut ScriptingHost,
        source: impl Into<String>,
    ) -> Result<(), EditError> {
        let source = source.into();
        let behavior = self.writable(host)?;
        if behavior.draft_source.as_deref() == Some(source.as_str()) {
            return Ok(());
        }
        behavior.draft_source = Some(source);
        Ok(())
    }

    /// Copy the behavior's content into the store as a fresh embedded
    /// behavior. This is how a read-only builtin or library behavior
    /// becomes editable.
    pub fn make_copy(&self, host: &mut ScriptingHost) -> Result<UnassignedBehavior, EditError> {
        let copy = self.resolve_anywhere(host)?;
        let id = BehaviorId::new();
        host.db.put_behavior(id, copy);
        Ok(UnassignedBehavior::new(BehaviorUri::embedded(id)))
    }

    /// `true` while the URI resolves in its address space.
    pub fn is_valid(&self, host: &ScriptingHost) -> bool {
        self.resolve_anywhere(host).is_ok()
    }

    /// Display text from the behavior's leading comment line, if any.
    pub fn summary(&self, host: &ScriptingHost) -> Option<String> {
        self.resolve_anywhere(host)
            .ok()
            .and_then(|b| b.inline_summary().map(str::to_string))
    }

    // Unlike use resolution, an unassigned handle may point at the user
    // library directly.
    fn resolve_anywhere(&self, host: &ScriptingHost) -> Result<Behavior, StoreError> {
        match &self.uri {
            BehaviorUri::UserLibrary(file) => host
                .library
                .resolve(file)
                .ok_or_else(|| StoreError::not_found("library behavior", file)),
            other => host.resolve(other),
        }
    }

    fn writable<'h>(&self, host: &'h mut ScriptingHost) -> Result<&'h mut Behavior, EditError> {
        let Some(id) = self.uri.behavior_id() else {
            return Err(EditError::InvalidState(format!(
                "{} is read-only; copy it before editing",
                self.uri
            )));
        };
        host.db
            .behaviors
            .get_mut(id)
            .ok_or_else(|| EditError::Store(StoreError::not_found("behavior", id)))
    }
}
