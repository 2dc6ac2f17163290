//! The scripting host - the store plus its runtime collaborators.

use std::collections::HashSet;

use behavior_store::{
    Behavior, BehaviorDatabase, BehaviorId, BehaviorUri, BuiltinCatalog, PropDef, StoreError,
    UserLibrary,
};
use behavior_store::{ActorId, UseId};
use serde_json::Value;
use tracing::warn;

use crate::collaborators::{ActorDirectory, ScriptCall, ScriptOutcome, ScriptRuntime};
use crate::editor::UnassignedBehavior;

/// The one aggregate editors operate on: the behavior database plus the
/// runtime services it cannot own.
pub struct ScriptingHost {
    pub db: BehaviorDatabase,
    pub actors: Box<dyn ActorDirectory>,
    pub scripts: Box<dyn ScriptRuntime>,
    pub builtins: Box<dyn BuiltinCatalog>,
    pub library: Box<dyn UserLibrary>,
}

impl ScriptingHost {
    pub fn new(
        actors: Box<dyn ActorDirectory>,
        scripts: Box<dyn ScriptRuntime>,
        builtins: Box<dyn BuiltinCatalog>,
        library: Box<dyn UserLibrary>,
    ) -> Self {
        Self {
            db: BehaviorDatabase::new(),
            actors,
            scripts,
            builtins,
            library,
        }
    }

    /// Call a function on the script backing one use of one actor.
    ///
    /// Returns the function's value, or `None` both when the behavior does
    /// not declare the function and when the call fails - callers treat
    /// script trouble as "no answer", never as a crash. Failures are logged.
    pub fn call_script_function(
        &mut self,
        use_id: UseId,
        actor_id: ActorId,
        method: &str,
        args: Value,
    ) -> Option<Value> {
        let call = ScriptCall {
            use_id,
            actor_id,
            method: method.to_string(),
            args,
        };
        match self.scripts.call_use_method(call) {
            ScriptOutcome::Returned(value) => Some(value),
            ScriptOutcome::Absent => None,
            ScriptOutcome::Failed(reason) => {
                warn!(%use_id, %actor_id, method, %reason, "script function failed");
                None
            }
        }
    }

    /// Store a brand-new custom behavior and hand back an unassigned handle
    /// to it, ready to be added to a brain.
    pub fn create_behavior(
        &mut self,
        source: impl Into<String>,
        metadata_json: Option<String>,
    ) -> UnassignedBehavior {
        let mut behavior = Behavior::new("Custom", source);
        behavior.metadata_json = metadata_json;
        let id = BehaviorId::new();
        self.db.put_behavior(id, behavior);
        UnassignedBehavior::new(BehaviorUri::embedded(id))
    }

    /// Resolve a behavior URI through the store and the builtin catalog.
    pub fn resolve(&self, uri: &BehaviorUri) -> Result<Behavior, StoreError> {
        self.db.resolve(uri, self.builtins.as_ref())
    }

    /// `true` if a use of the given URI would resolve.
    pub fn is_use_valid(&self, uri: &BehaviorUri) -> bool {
        self.db.is_use_valid(uri, self.builtins.as_ref())
    }

    /// All property declarations for a behavior: the legacy comment-syntax
    /// declarations parsed from its source first, then the structured
    /// declarations the running script exported. First declaration of a
    /// name wins.
    pub fn behavior_prop_defs(&self, uri: &BehaviorUri) -> Result<Vec<PropDef>, StoreError> {
        let behavior = self.resolve(uri)?;
        let mut defs = behavior_store::props::parse_legacy_props(&behavior.source);
        defs.extend(self.scripts.exported_prop_defs(uri));

        let mut seen = HashSet::new();
        defs.retain(|def| seen.insert(def.variable_name.clone()));
        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::world;
    use behavior_store::PropType;

    #[test]
    fn test_dispatch_returned_value() {
        let mut w = world();
        w.scripts.0.borrow_mut().outcomes.insert(
            "getSpeed".to_string(),
            ScriptOutcome::Returned(serde_json::json!(5.0)),
        );

        let use_id = UseId::new();
        let actor_id = ActorId::new();
        let result = w
            .host
            .call_script_function(use_id, actor_id, "getSpeed", Value::Null);

        assert_eq!(result, Some(serde_json::json!(5.0)));
        let calls = &w.scripts.0.borrow().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].use_id, use_id);
        assert_eq!(calls[0].method, "getSpeed");
    }

    #[test]
    fn test_dispatch_absent_and_failed_are_none() {
        let mut w = world();
        w.scripts.0.borrow_mut().outcomes.insert(
            "explode".to_string(),
            ScriptOutcome::Failed("boom".to_string()),
        );

        let use_id = UseId::new();
        let actor_id = ActorId::new();
        assert_eq!(
            w.host
                .call_script_function(use_id, actor_id, "noSuchFn", Value::Null),
            None
        );
        assert_eq!(
            w.host
                .call_script_function(use_id, actor_id, "explode", Value::Null),
            None
        );
        // Both calls still reached the runtime.
        assert_eq!(w.scripts.0.borrow().calls.len(), 2);
    }

    #[test]
    fn test_create_behavior_is_embedded() {
        let mut w = world();
        let handle = w
            .host
            .create_behavior("// does nothing", Some("{}".to_string()));

        assert!(handle.uri().is_embedded());
        let behavior = w.host.resolve(handle.uri()).unwrap();
        assert_eq!(behavior.label, "Custom");
        assert_eq!(behavior.source, "// does nothing");
        assert_eq!(behavior.metadata_json.as_deref(), Some("{}"));
    }

    #[test]
    fn test_prop_defs_merge_legacy_before_exported() {
        let mut w = world();
        let handle = w.host.create_behavior(
            "// property Number speed 5\nexport function onTick() {}",
            None,
        );

        // The script exports a conflicting `speed` plus a new `mood`.
        let exported = vec![
            PropDef::new(PropType::Number, "speed").with_default("99"),
            PropDef::new(PropType::EnumVal, "mood").with_default("calm"),
        ];
        w.scripts
            .0
            .borrow_mut()
            .exported
            .insert(handle.uri().to_string(), exported);

        let defs = w.host.behavior_prop_defs(handle.uri()).unwrap();
        assert_eq!(defs.len(), 2);
        // The legacy declaration wins for the duplicated name.
        assert_eq!(defs[0].variable_name, "speed");
        assert_eq!(defs[0].default_value.as_deref(), Some("5"));
        assert_eq!(defs[1].variable_name, "mood");
        assert_eq!(defs[1].prop_type, PropType::EnumVal);
    }

    #[test]
    fn test_prop_defs_for_unresolvable_uri_fail() {
        let w = world();
        let uri = BehaviorUri::embedded(BehaviorId::new());
        assert!(w.host.behavior_prop_defs(&uri).is_err());
    }
}
