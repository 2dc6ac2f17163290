//! The behavior/brain database: keyed tables, URI resolution, garbage
//! collection, and saved-world import/export.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

use crate::catalog::BuiltinCatalog;
use crate::error::StoreError;
use crate::model::{Behavior, BehaviorId, BehaviorUse, Brain, BrainId, UseId};
use crate::uri::BehaviorUri;

/// A keyed table of entities. `set` is an upsert, `get` never fails.
#[derive(Debug, Clone)]
pub struct Table<I, T> {
    entries: HashMap<I, T>,
}

impl<I: Eq + Hash + Copy, T> Table<I, T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the entity under the given ID.
    pub fn set(&mut self, id: I, value: T) {
        self.entries.insert(id, value);
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// Remove the entity. Returns `false` if it was not present.
    pub fn delete(&mut self, id: I) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn exists(&self, id: I) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entities the predicate accepts.
    pub fn retain(&mut self, mut keep: impl FnMut(I, &T) -> bool) {
        self.entries.retain(|id, value| keep(*id, value));
    }
}

impl<I: Eq + Hash + Copy, T> Default for Table<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The content store: every embedded behavior and every brain in the world.
///
/// The database holds content only. Which actor runs which brain lives in
/// the actor directory, which is also why garbage collection has to be told
/// the set of brain IDs still in use.
#[derive(Debug, Clone, Default)]
pub struct BehaviorDatabase {
    pub behaviors: Table<BehaviorId, Behavior>,
    pub brains: Table<BrainId, Brain>,
}

impl BehaviorDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a behavior, failing with `NotFound` when absent.
    pub fn behavior(&self, id: BehaviorId) -> Result<&Behavior, StoreError> {
        self.behaviors
            .get(id)
            .ok_or_else(|| StoreError::not_found("behavior", id))
    }

    /// Look up a brain, failing with `NotFound` when absent.
    pub fn brain(&self, id: BrainId) -> Result<&Brain, StoreError> {
        self.brains
            .get(id)
            .ok_or_else(|| StoreError::not_found("brain", id))
    }

    pub fn put_behavior(&mut self, id: BehaviorId, behavior: Behavior) {
        self.behaviors.set(id, behavior);
    }

    pub fn put_brain(&mut self, id: BrainId, brain: Brain) {
        self.brains.set(id, brain);
    }

    pub fn delete_behavior(&mut self, id: BehaviorId) -> bool {
        self.behaviors.delete(id)
    }

    pub fn delete_brain(&mut self, id: BrainId) -> bool {
        self.brains.delete(id)
    }

    pub fn has_behavior(&self, id: BehaviorId) -> bool {
        self.behaviors.exists(id)
    }

    pub fn has_brain(&self, id: BrainId) -> bool {
        self.brains.exists(id)
    }

    /// Resolve a behavior URI to its content.
    ///
    /// `embedded:` resolves through the behavior table, `builtin:` through
    /// the supplied catalog. `userlib:` never resolves here - library
    /// behaviors must be imported into the store first.
    pub fn resolve(
        &self,
        uri: &BehaviorUri,
        builtins: &dyn BuiltinCatalog,
    ) -> Result<Behavior, StoreError> {
        match uri {
            BehaviorUri::Embedded(id) => self.behavior(*id).cloned(),
            BehaviorUri::Builtin(name) => builtins
                .resolve(name)
                .ok_or_else(|| StoreError::not_found("builtin behavior", name)),
            BehaviorUri::UserLibrary(file) => {
                Err(StoreError::not_found("library behavior", file))
            }
        }
    }

    /// `true` if a use of the given URI would resolve.
    pub fn is_use_valid(&self, uri: &BehaviorUri, builtins: &dyn BuiltinCatalog) -> bool {
        match uri {
            BehaviorUri::Embedded(id) => self.has_behavior(*id),
            BehaviorUri::Builtin(name) => builtins.contains(name),
            BehaviorUri::UserLibrary(_) => false,
        }
    }

    /// All uses of a behavior across every brain, as (brain, use) pairs.
    pub fn uses_of_behavior(
        &self,
        id: BehaviorId,
    ) -> impl Iterator<Item = (BrainId, &BehaviorUse)> {
        self.brains.iter().flat_map(move |(brain_id, brain)| {
            brain
                .uses()
                .iter()
                .filter(move |u| u.behavior_uri.behavior_id() == Some(id))
                .map(move |u| (brain_id, u))
        })
    }

    pub fn count_uses_of_behavior(&self, id: BehaviorId) -> usize {
        self.uses_of_behavior(id).count()
    }

    /// The brains containing at least one use of a behavior.
    pub fn brains_using_behavior(&self, id: BehaviorId) -> Vec<BrainId> {
        let mut brain_ids: Vec<BrainId> =
            self.uses_of_behavior(id).map(|(brain_id, _)| brain_id).collect();
        brain_ids.dedup();
        brain_ids
    }

    /// Deep-copy a brain under a fresh ID. Uses keep their IDs (use IDs are
    /// only unique per brain) and keep pointing at the same behaviors, so
    /// the copy shares behavior content with the original.
    pub fn clone_brain(&mut self, id: BrainId) -> Result<BrainId, StoreError> {
        let copy = self.brain(id)?.clone();
        let new_id = BrainId::new();
        self.brains.set(new_id, copy);
        Ok(new_id)
    }

    /// Drop brains whose IDs are not in `used_brain_ids` and, when
    /// `remove_unused_behaviors` is set, behaviors no surviving brain uses.
    ///
    /// The caller gathers `used_brain_ids` from the actor directory. The
    /// behavior flag exists because an editor may want unreferenced
    /// behaviors kept around (a card pulled off every panel is not yet
    /// trash).
    pub fn garbage_collect(
        &mut self,
        remove_unused_behaviors: bool,
        used_brain_ids: &HashSet<BrainId>,
    ) {
        let brains_before = self.brains.len();
        self.brains.retain(|id, _| used_brain_ids.contains(&id));

        let mut behaviors_removed = 0;
        if remove_unused_behaviors {
            let mut referenced = HashSet::new();
            for (_, brain) in self.brains.iter() {
                for use_ in brain.uses() {
                    if let Some(behavior_id) = use_.behavior_uri.behavior_id() {
                        referenced.insert(behavior_id);
                    }
                }
            }
            let behaviors_before = self.behaviors.len();
            self.behaviors.retain(|id, _| referenced.contains(&id));
            behaviors_removed = behaviors_before - self.behaviors.len();
        }

        debug!(
            brains_removed = brains_before - self.brains.len(),
            behaviors_removed, "garbage collected"
        );
    }

    /// Snapshot the whole database for persistence.
    pub fn save(&self) -> SavedDatabase {
        SavedDatabase {
            behaviors: self.behaviors.iter().map(|(id, b)| (id, b.clone())).collect(),
            brains: self.brains.iter().map(|(id, b)| (id, b.clone())).collect(),
        }
    }

    /// Rebuild a database from a snapshot, garbage collecting on the way in
    /// so stale content in old saves does not survive the load.
    pub fn load(
        saved: SavedDatabase,
        remove_unused_behaviors: bool,
        used_brain_ids: &HashSet<BrainId>,
    ) -> Self {
        let mut db = Self::new();
        for (id, behavior) in saved.behaviors {
            db.behaviors.set(id, behavior);
        }
        for (id, brain) in saved.brains {
            db.brains.set(id, brain);
        }
        db.garbage_collect(remove_unused_behaviors, used_brain_ids);
        db
    }

    /// Export one brain with the embedded behaviors it uses, as a
    /// self-contained snapshot suitable for transfer between worlds.
    pub fn export_brain(&self, id: BrainId) -> Result<SavedDatabase, StoreError> {
        let brain = self.brain(id)?;
        let mut behaviors = HashMap::new();
        for use_ in brain.uses() {
            if let Some(behavior_id) = use_.behavior_uri.behavior_id() {
                behaviors.insert(behavior_id, self.behavior(behavior_id)?.clone());
            }
        }
        Ok(SavedDatabase {
            behaviors,
            brains: HashMap::from([(id, brain.clone())]),
        })
    }

    /// Import a brain from an exported snapshot under fresh IDs.
    ///
    /// Every behavior in the snapshot is re-keyed so an import can never
    /// collide with (or silently overwrite) existing content, and the
    /// brain's embedded URIs are rewritten to match.
    pub fn import_brain(
        &mut self,
        exported: &SavedDatabase,
        brain_id: BrainId,
    ) -> Result<BrainId, StoreError> {
        let brain = exported
            .brains
            .get(&brain_id)
            .ok_or_else(|| StoreError::not_found("brain", brain_id))?;

        let mut id_map = HashMap::new();
        for (old_id, behavior) in &exported.behaviors {
            let new_id = BehaviorId::new();
            id_map.insert(*old_id, new_id);
            self.behaviors.set(new_id, behavior.clone());
        }

        let mut imported = brain.clone();
        for use_ in &mut imported.behavior_uses {
            if let Some(old_id) = use_.behavior_uri.behavior_id() {
                let new_id = id_map
                    .get(&old_id)
                    .ok_or_else(|| StoreError::not_found("behavior", old_id))?;
                use_.behavior_uri = BehaviorUri::embedded(*new_id);
            }
        }

        let new_brain_id = BrainId::new();
        self.brains.set(new_brain_id, imported);
        Ok(new_brain_id)
    }
}

/// The serialized form of the database, as written into a saved world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedDatabase {
    #[serde(default)]
    pub behaviors: HashMap<BehaviorId, Behavior>,
    #[serde(default)]
    pub brains: HashMap<BrainId, Brain>,
}
