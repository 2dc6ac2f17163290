//! In-memory fakes for the collaborator traits, shared by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use behavior_store::{
    ActorId, Behavior, BehaviorUri, Brain, BrainId, BuiltinCatalog, PropDef, UseId, UserLibrary,
};

use crate::collaborators::{ActorDirectory, ScriptCall, ScriptOutcome, ScriptRuntime};
use crate::host::ScriptingHost;

#[derive(Default)]
pub struct ActorsState {
    pub brains: HashMap<ActorId, BrainId>,
    pub owned: HashSet<ActorId>,
    pub replayed: Vec<ActorId>,
}

/// Fake actor directory. Cloning shares the state, so tests keep a handle
/// to the same directory the host owns.
#[derive(Clone, Default)]
pub struct FakeActors(pub Rc<RefCell<ActorsState>>);

impl FakeActors {
    pub fn spawn(&self, brain_id: BrainId, owned: bool) -> ActorId {
        let actor_id = ActorId::new();
        let mut state = self.0.borrow_mut();
        state.brains.insert(actor_id, brain_id);
        if owned {
            state.owned.insert(actor_id);
        }
        actor_id
    }

    pub fn brain_for_actor(&self, actor_id: ActorId) -> Option<BrainId> {
        self.0.borrow().brains.get(&actor_id).copied()
    }
}

impl ActorDirectory for FakeActors {
    fn brain_for_actor(&self, actor_id: ActorId) -> Option<BrainId> {
        FakeActors::brain_for_actor(self, actor_id)
    }

    fn set_brain_for_actor(&mut self, actor_id: ActorId, brain_id: BrainId) -> bool {
        match self.0.borrow_mut().brains.get_mut(&actor_id) {
            Some(slot) => {
                *slot = brain_id;
                true
            }
            None => false,
        }
    }

    fn is_locally_owned(&self, actor_id: ActorId) -> bool {
        self.0.borrow().owned.contains(&actor_id)
    }

    fn notify_brain_replayed(&mut self, actor_id: ActorId) {
        self.0.borrow_mut().replayed.push(actor_id);
    }
}

#[derive(Default)]
pub struct ScriptsState {
    pub calls: Vec<ScriptCall>,
    pub removed: Vec<(BrainId, UseId)>,
    /// Structured declarations keyed by URI text.
    pub exported: HashMap<String, Vec<PropDef>>,
    /// Outcome per method name; unlisted methods are `Absent`.
    pub outcomes: HashMap<String, ScriptOutcome>,
}

/// Fake script runtime that records everything dispatched to it.
#[derive(Clone, Default)]
pub struct FakeScripts(pub Rc<RefCell<ScriptsState>>);

impl ScriptRuntime for FakeScripts {
    fn call_use_method(&mut self, call: ScriptCall) -> ScriptOutcome {
        let outcome = self
            .0
            .borrow()
            .outcomes
            .get(&call.method)
            .cloned()
            .unwrap_or(ScriptOutcome::Absent);
        self.0.borrow_mut().calls.push(call);
        outcome
    }

    fn notify_use_removed(&mut self, brain_id: BrainId, use_id: UseId) {
        self.0.borrow_mut().removed.push((brain_id, use_id));
    }

    fn exported_prop_defs(&self, uri: &BehaviorUri) -> Vec<PropDef> {
        self.0
            .borrow()
            .exported
            .get(&uri.to_string())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct StaticBuiltins(pub Rc<RefCell<HashMap<String, Behavior>>>);

impl BuiltinCatalog for StaticBuiltins {
    fn resolve(&self, name: &str) -> Option<Behavior> {
        self.0.borrow().get(name).cloned()
    }
}

#[derive(Clone, Default)]
pub struct FakeLibrary(pub Rc<RefCell<HashMap<String, Behavior>>>);

impl UserLibrary for FakeLibrary {
    fn resolve(&self, file: &str) -> Option<Behavior> {
        self.0.borrow().get(file).cloned()
    }
}

/// A host wired to fakes, plus handles to each fake's shared state.
pub struct TestWorld {
    pub host: ScriptingHost,
    pub actors: FakeActors,
    pub scripts: FakeScripts,
    pub builtins: StaticBuiltins,
    pub library: FakeLibrary,
}

/// A fresh world with an empty default brain already in the store.
pub fn world() -> TestWorld {
    let actors = FakeActors::default();
    let scripts = FakeScripts::default();
    let builtins = StaticBuiltins::default();
    let library = FakeLibrary::default();
    let mut host = ScriptingHost::new(
        Box::new(actors.clone()),
        Box::new(scripts.clone()),
        Box::new(builtins.clone()),
        Box::new(library.clone()),
    );
    host.db.put_brain(BrainId::DEFAULT, Brain::new());
    TestWorld {
        host,
        actors,
        scripts,
        builtins,
        library,
    }
}

/// [`world`] plus one builtin in the catalog.
pub fn world_with_builtin(name: &str, behavior: Behavior) -> TestWorld {
    let w = world();
    w.builtins.0.borrow_mut().insert(name.to_string(), behavior);
    w
}

/// Spawn a locally owned actor with a fresh private brain.
pub fn actor_with_brain(w: &mut TestWorld) -> (ActorId, BrainId) {
    let brain_id = BrainId::new();
    w.host.db.put_brain(brain_id, Brain::new());
    let actor_id = w.actors.spawn(brain_id, true);
    (actor_id, brain_id)
}
