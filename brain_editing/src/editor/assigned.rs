//! Handle to a behavior already placed on an actor's brain.

use behavior_store::{Behavior, BehaviorUri, BehaviorUse, PropSlot, UseId};
use behavior_store::ActorId;
use serde_json::Value;

use crate::error::EditError;
use crate::host::ScriptingHost;

/// One use of a behavior on one actor's brain.
///
/// Plain IDs, no borrowed state: the handle stays cheap to copy and simply
/// reports invalid once the use, brain, or actor disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignedBehavior {
    use_id: UseId,
    actor_id: ActorId,
}

impl AssignedBehavior {
    pub fn new(use_id: UseId, actor_id: ActorId) -> Self {
        Self { use_id, actor_id }
    }

    pub fn use_id(&self) -> UseId {
        self.use_id
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    fn behavior_use(&self, host: &ScriptingHost) -> Result<BehaviorUse, EditError> {
        let brain_id = host.actors.brain_for_actor(self.actor_id).ok_or_else(|| {
            EditError::InvalidState(format!("actor {} no longer exists", self.actor_id))
        })?;
        host.db
            .brain(brain_id)?
            .use_by_id(self.use_id)
            .cloned()
            .ok_or_else(|| {
                EditError::InvalidState(format!("use {} no longer exists", self.use_id))
            })
    }

    /// The URI of the behavior this use points at.
    pub fn behavior_uri(&self, host: &ScriptingHost) -> Result<BehaviorUri, EditError> {
        Ok(self.behavior_use(host)?.behavior_uri)
    }

    /// The behavior content this use points at.
    pub fn behavior(&self, host: &ScriptingHost) -> Result<Behavior, EditError> {
        let uri = self.behavior_uri(host)?;
        Ok(host.resolve(&uri)?)
    }

    /// Every declared property of the behavior, paired with this use's
    /// current value for it (assignment if present, default otherwise).
    pub fn properties(&self, host: &ScriptingHost) -> Result<Vec<PropSlot>, EditError> {
        let use_ = self.behavior_use(host)?;
        let defs = host.behavior_prop_defs(&use_.behavior_uri)?;
        Ok(defs
            .into_iter()
            .map(|def| {
                let assignment = use_.assignment(&def.variable_name);
                PropSlot::new(def, assignment)
            })
            .collect())
    }

    /// `true` while the use exists and its behavior resolves.
    pub fn is_valid(&self, host: &ScriptingHost) -> bool {
        self.behavior_use(host)
            .map(|u| host.is_use_valid(&u.behavior_uri))
            .unwrap_or(false)
    }

    /// Call a function on the script backing this use. See
    /// [`ScriptingHost::call_script_function`].
    pub fn call_script_function(
        &self,
        host: &mut ScriptingHost,
        method: &str,
        args: Value,
    ) -> Option<Value> {
        host.call_script_function(self.use_id, self.actor_id, method, args)
    }
}
