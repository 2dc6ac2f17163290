//! The brain editor - all writes to an actor's brain go through here.

mod assigned;
mod unassigned;

pub use assigned::*;
pub use unassigned::*;

use behavior_store::{
    BehaviorId, BehaviorUri, BehaviorUse, Brain, BrainId, PropDef, PropSlot, PropertyAssignment,
    StoreError, UseId,
};
use behavior_store::{props, ActorId, PropValue};
use tracing::debug;

use crate::error::EditError;
use crate::host::ScriptingHost;
use crate::undo::{UndoEntry, UndoScope, UndoStack};

/// Editing facade for one actor's brain.
///
/// The editor holds no brain data and no borrowed state - just the actor ID
/// and the undo scope depth - so handles stay valid across arbitrary world
/// changes and simply start failing with
/// [`InvalidState`](EditError::InvalidState) when the actor or its brain
/// disappears.
///
/// Every mutation re-checks authorization and performs copy-on-write: an
/// actor still running the shared default brain gets a private clone the
/// first time it is actually edited, never earlier.
#[derive(Debug)]
pub struct BrainEditor {
    actor_id: ActorId,
    scope_depth: usize,
}

impl BrainEditor {
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            scope_depth: 0,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    /// `true` while the actor exists and its brain is in the store.
    pub fn is_valid(&self, host: &ScriptingHost) -> bool {
        self.brain_id(host)
            .map(|id| host.db.has_brain(id))
            .unwrap_or(false)
    }

    /// `true` when this participant is allowed to edit the actor.
    pub fn can_write(&self, host: &ScriptingHost) -> bool {
        host.actors.is_locally_owned(self.actor_id)
    }

    /// The actor's current brain ID.
    pub fn brain_id(&self, host: &ScriptingHost) -> Result<BrainId, EditError> {
        host.actors.brain_for_actor(self.actor_id).ok_or_else(|| {
            EditError::InvalidState(format!("actor {} no longer exists", self.actor_id))
        })
    }

    /// A snapshot of the actor's current brain content.
    pub fn brain(&self, host: &ScriptingHost) -> Result<Brain, EditError> {
        let brain_id = self.brain_id(host)?;
        Ok(host.db.brain(brain_id)?.clone())
    }

    /// Authorize a write and return the brain to write to, cloning the
    /// shared default brain first if the actor still runs it.
    ///
    /// Idempotent: once the actor has a private brain this just hands its
    /// ID back.
    pub fn ensure_owned_brain(&self, host: &mut ScriptingHost) -> Result<BrainId, EditError> {
        let brain_id = self.brain_id(host)?;
        if !host.actors.is_locally_owned(self.actor_id) {
            return Err(EditError::Unauthorized(self.actor_id));
        }
        if !host.db.has_brain(brain_id) {
            return Err(EditError::InvalidState(format!(
                "brain {brain_id} no longer exists"
            )));
        }
        if !brain_id.is_default() {
            return Ok(brain_id);
        }

        let private_id = host.db.clone_brain(brain_id)?;
        host.actors.set_brain_for_actor(self.actor_id, private_id);
        debug!(actor = %self.actor_id, brain = %private_id, "cloned shared default brain for editing");
        Ok(private_id)
    }

    /// Add a behavior to the brain as a new use.
    ///
    /// A `userlib:` behavior is imported first - copied from the user
    /// library into the store under a fresh ID - so the brain only ever
    /// references embedded or builtin behaviors.
    pub fn add_behavior(
        &self,
        host: &mut ScriptingHost,
        behavior: &UnassignedBehavior,
    ) -> Result<AssignedBehavior, EditError> {
        let brain_id = self.ensure_owned_brain(host)?;

        let uri = match behavior.uri() {
            BehaviorUri::UserLibrary(file) => {
                let imported = host
                    .library
                    .resolve(file)
                    .ok_or_else(|| StoreError::not_found("library behavior", file))?;
                let id = BehaviorId::new();
                host.db.put_behavior(id, imported);
                BehaviorUri::embedded(id)
            }
            other => other.clone(),
        };

        let new_use = BehaviorUse::new(uri);
        let use_id = new_use.id;
        let mut brain = host.db.brain(brain_id)?.clone();
        brain.add_use(new_use);
        host.db.put_brain(brain_id, brain);
        Ok(AssignedBehavior::new(use_id, self.actor_id))
    }

    /// Remove a use from the brain. The behavior itself stays in the store;
    /// reclaiming unused behaviors is the garbage collector's call.
    pub fn remove_behavior(
        &self,
        host: &mut ScriptingHost,
        assigned: &AssignedBehavior,
    ) -> Result<(), EditError> {
        let brain_id = self.ensure_owned_brain(host)?;
        let use_id = assigned.use_id();

        let mut brain = host.db.brain(brain_id)?.clone();
        if !brain.has_use(use_id) {
            return Err(EditError::InvalidState(format!(
                "use {use_id} no longer exists"
            )));
        }
        // The runtime tears down per-use script state while the use still
        // exists.
        host.scripts.notify_use_removed(brain_id, use_id);
        brain.delete_use(use_id);
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Replace a use's property assignments wholesale.
    ///
    /// Assignments whose names match a declared property are validated
    /// strictly against the declared type; names with no declaration pass
    /// through untouched (their declarations may simply not be loaded yet).
    /// Duplicate names collapse last-wins, keeping names unique within the
    /// use the way [`BehaviorUse::set_assignment`] does.
    pub fn set_properties(
        &self,
        host: &mut ScriptingHost,
        use_id: UseId,
        assignments: Vec<PropertyAssignment>,
    ) -> Result<(), EditError> {
        let mut merged: Vec<PropertyAssignment> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            match merged
                .iter_mut()
                .find(|a| a.property_name == assignment.property_name)
            {
                Some(existing) => existing.value = assignment.value,
                None => merged.push(assignment),
            }
        }

        let current = self.brain(host)?;
        let use_ = current.use_by_id(use_id).ok_or_else(|| {
            EditError::InvalidState(format!("use {use_id} no longer exists"))
        })?;
        let defs = host.behavior_prop_defs(&use_.behavior_uri)?;
        for assignment in &merged {
            if let Some(def) = defs
                .iter()
                .find(|d| d.variable_name == assignment.property_name)
            {
                props::decode(def.prop_type, &assignment.property_name, &assignment.value)?;
            }
        }

        let brain_id = self.ensure_owned_brain(host)?;
        let mut brain = host.db.brain(brain_id)?.clone();
        match brain.behavior_uses.iter_mut().find(|u| u.id == use_id) {
            Some(slot) => slot.property_assignments = merged,
            None => {
                return Err(EditError::InvalidState(format!(
                    "use {use_id} no longer exists"
                )))
            }
        }
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Set one property of one use, under its own undo scope.
    ///
    /// Writing the value the property already holds is a complete no-op:
    /// no store write, no copy-on-write clone, no undo entry.
    pub fn set_property(
        &mut self,
        host: &mut ScriptingHost,
        undo: Option<&mut UndoStack>,
        use_id: UseId,
        name: &str,
        value: PropValue,
    ) -> Result<(), EditError> {
        let scope = self.start_undo(host, format!("Set {name}"))?;
        let result = self.write_property(host, use_id, name, value);
        self.end_undo(host, undo, scope)?;
        result
    }

    fn write_property(
        &self,
        host: &mut ScriptingHost,
        use_id: UseId,
        name: &str,
        value: PropValue,
    ) -> Result<(), EditError> {
        let current = self.brain(host)?;
        let use_ = current.use_by_id(use_id).ok_or_else(|| {
            EditError::InvalidState(format!("use {use_id} no longer exists"))
        })?;
        let defs = host.behavior_prop_defs(&use_.behavior_uri)?;
        let def = defs
            .into_iter()
            .find(|d| d.variable_name == name)
            .unwrap_or_else(|| PropDef::new(value.prop_type(), name));

        let mut slot = PropSlot::new(def, use_.assignment(name));
        let Some(assignment) = slot.set(value) else {
            return Ok(());
        };

        let brain_id = self.ensure_owned_brain(host)?;
        let mut brain = host.db.brain(brain_id)?.clone();
        match brain.behavior_uses.iter_mut().find(|u| u.id == use_id) {
            Some(slot) => slot.set_assignment(&assignment.property_name, assignment.value),
            None => {
                return Err(EditError::InvalidState(format!(
                    "use {use_id} no longer exists"
                )))
            }
        }
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Replace the brain's content wholesale.
    pub fn set_brain(&self, host: &mut ScriptingHost, brain: Brain) -> Result<(), EditError> {
        let brain_id = self.ensure_owned_brain(host)?;
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Set the brain's opaque metadata blob. Equal values are a no-op.
    pub fn set_brain_metadata(
        &self,
        host: &mut ScriptingHost,
        metadata_json: Option<String>,
    ) -> Result<(), EditError> {
        if self.brain(host)?.metadata_json == metadata_json {
            return Ok(());
        }
        let brain_id = self.ensure_owned_brain(host)?;
        let mut brain = host.db.brain(brain_id)?.clone();
        brain.metadata_json = metadata_json;
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Set one use's opaque metadata blob. Equal values are a no-op.
    pub fn set_use_metadata(
        &self,
        host: &mut ScriptingHost,
        use_id: UseId,
        metadata_json: Option<String>,
    ) -> Result<(), EditError> {
        let current = self.brain(host)?;
        let use_ = current.use_by_id(use_id).ok_or_else(|| {
            EditError::InvalidState(format!("use {use_id} no longer exists"))
        })?;
        if use_.metadata_json == metadata_json {
            return Ok(());
        }

        let brain_id = self.ensure_owned_brain(host)?;
        let mut brain = host.db.brain(brain_id)?.clone();
        match brain.behavior_uses.iter_mut().find(|u| u.id == use_id) {
            Some(slot) => slot.metadata_json = metadata_json,
            None => {
                return Err(EditError::InvalidState(format!(
                    "use {use_id} no longer exists"
                )))
            }
        }
        host.db.put_brain(brain_id, brain);
        Ok(())
    }

    /// Handles for every use currently on the brain, in order.
    pub fn assigned_behaviors(
        &self,
        host: &ScriptingHost,
    ) -> Result<Vec<AssignedBehavior>, EditError> {
        Ok(self
            .brain(host)?
            .uses()
            .iter()
            .map(|u| AssignedBehavior::new(u.id, self.actor_id))
            .collect())
    }

    /// Open an undo scope. Only the outermost scope snapshots the brain;
    /// nested scopes contribute their writes to it.
    pub fn start_undo(
        &mut self,
        host: &ScriptingHost,
        label: impl Into<String>,
    ) -> Result<UndoScope, EditError> {
        let before = if self.scope_depth == 0 {
            Some(self.brain(host)?)
        } else {
            None
        };
        self.scope_depth += 1;
        Ok(UndoScope {
            label: label.into(),
            before,
        })
    }

    /// Close an undo scope. Closing the outermost scope compares the brain
    /// against the snapshot; if anything changed, one entry covering every
    /// write in the scope is recorded on the stack (when one is given).
    pub fn end_undo(
        &mut self,
        host: &mut ScriptingHost,
        undo: Option<&mut UndoStack>,
        scope: UndoScope,
    ) -> Result<(), EditError> {
        self.scope_depth = self.scope_depth.saturating_sub(1);
        let Some(before) = scope.before else {
            return Ok(());
        };

        let after = self.brain(host)?;
        if before == after {
            return Ok(());
        }

        let mut entry = UndoEntry::new(scope.label, self.actor_id, before, after);
        entry.apply(host)?;
        if let Some(stack) = undo {
            stack.push(entry);
        }
        Ok(())
    }
}
