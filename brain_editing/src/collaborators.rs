//! Collaborator traits - the seams where the hosting runtime plugs in.
//!
//! The editor needs two things it cannot own: the actor directory (which
//! actor runs which brain, and who is allowed to edit it) and the script
//! engine that actually executes behavior source. Both are trait objects on
//! [`ScriptingHost`](crate::host::ScriptingHost), so tests run against
//! in-memory fakes.

use behavior_store::{ActorId, BehaviorUri, BrainId, PropDef, UseId};
use serde_json::Value;

/// One script function invocation, addressed to a use on an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCall {
    pub use_id: UseId,
    pub actor_id: ActorId,
    pub method: String,
    pub args: Value,
}

/// What became of a dispatched script call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    /// The function ran and returned a value.
    Returned(Value),
    /// The use's behavior declares no such function. Not an error.
    Absent,
    /// The function threw or the runtime refused the call.
    Failed(String),
}

/// The actor directory: brain assignment and edit authorization.
pub trait ActorDirectory {
    /// The brain the actor currently runs, or `None` if the actor is gone.
    fn brain_for_actor(&self, actor_id: ActorId) -> Option<BrainId>;

    /// Point the actor at a different brain. Returns `false` if the actor
    /// is gone.
    fn set_brain_for_actor(&mut self, actor_id: ActorId, brain_id: BrainId) -> bool;

    /// `true` when this participant may edit the actor. In a networked
    /// session only the owning participant writes.
    fn is_locally_owned(&self, actor_id: ActorId) -> bool;

    /// The actor's brain content was replaced wholesale (undo/redo replay);
    /// running script state for it should be reset.
    fn notify_brain_replayed(&mut self, actor_id: ActorId);
}

/// The script engine executing behavior source.
pub trait ScriptRuntime {
    /// Dispatch a function call to the script backing one use.
    fn call_use_method(&mut self, call: ScriptCall) -> ScriptOutcome;

    /// A use is about to be deleted; tear down its per-use script state
    /// (timers, memory) while it still exists.
    fn notify_use_removed(&mut self, brain_id: BrainId, use_id: UseId);

    /// Structured property declarations the running script exported as
    /// data, for behaviors using the current script API generation.
    fn exported_prop_defs(&self, uri: &BehaviorUri) -> Vec<PropDef>;
}
