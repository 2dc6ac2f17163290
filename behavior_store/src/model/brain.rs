//! Brain and behavior-use definitions.

use serde::{Deserialize, Serialize};

use super::UseId;
use crate::uri::BehaviorUri;

/// One serialized property value attached to a use, keyed by property name.
///
/// The value is carried as raw JSON - the dynamically-typed slot that the
/// property codec interprets against a declared type at read/validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub property_name: String,
    pub value: serde_json::Value,
}

impl PropertyAssignment {
    /// Create an assignment from a name and a raw JSON value.
    pub fn new(property_name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            property_name: property_name.into(),
            value,
        }
    }
}

/// One instantiation of a behavior inside a brain, with its own property
/// assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorUse {
    /// Only unique within the owning brain.
    pub id: UseId,
    pub behavior_uri: BehaviorUri,
    /// Invariant: property names are unique within one use.
    #[serde(default)]
    pub property_assignments: Vec<PropertyAssignment>,
    #[serde(default)]
    pub metadata_json: Option<String>,
}

impl BehaviorUse {
    /// Create a fresh use of the given behavior with no assignments.
    pub fn new(behavior_uri: BehaviorUri) -> Self {
        Self {
            id: UseId::new(),
            behavior_uri,
            property_assignments: Vec::new(),
            metadata_json: None,
        }
    }

    /// Look up an assignment by property name.
    pub fn assignment(&self, property_name: &str) -> Option<&PropertyAssignment> {
        self.property_assignments
            .iter()
            .find(|a| a.property_name == property_name)
    }

    /// Replace or add an assignment, preserving the unique-name invariant.
    pub fn set_assignment(&mut self, property_name: &str, value: serde_json::Value) {
        match self
            .property_assignments
            .iter_mut()
            .find(|a| a.property_name == property_name)
        {
            Some(existing) => existing.value = value,
            None => self
                .property_assignments
                .push(PropertyAssignment::new(property_name, value)),
        }
    }
}

/// An ordered collection of behavior uses. Many actors can share one brain.
///
/// Brains are mutated only through [`add_use`](Brain::add_use) /
/// [`delete_use`](Brain::delete_use) / [`set_use`](Brain::set_use), which
/// preserves use ordering and ID stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Brain {
    pub behavior_uses: Vec<BehaviorUse>,

    /// Completely opaque, controlled by the UI (panel layout and the like).
    #[serde(default)]
    pub metadata_json: Option<String>,
}

impl Brain {
    /// Create a new empty brain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a use. Use IDs must be unique within the brain.
    pub fn add_use(&mut self, new_use: BehaviorUse) {
        debug_assert!(!self.has_use(new_use.id), "duplicate use id {}", new_use.id);
        self.behavior_uses.push(new_use);
    }

    /// Replace the use with the same ID in place. Returns `false` if no use
    /// with that ID exists.
    pub fn set_use(&mut self, new_use: BehaviorUse) -> bool {
        match self.behavior_uses.iter_mut().find(|u| u.id == new_use.id) {
            Some(slot) => {
                *slot = new_use;
                true
            }
            None => false,
        }
    }

    /// Remove the use with the given ID, keeping the order of the rest.
    /// Returns `false` if no use with that ID exists.
    pub fn delete_use(&mut self, use_id: UseId) -> bool {
        let before = self.behavior_uses.len();
        self.behavior_uses.retain(|u| u.id != use_id);
        self.behavior_uses.len() != before
    }

    /// Look up a use by ID.
    pub fn use_by_id(&self, use_id: UseId) -> Option<&BehaviorUse> {
        self.behavior_uses.iter().find(|u| u.id == use_id)
    }

    /// `true` if a use with the given ID exists.
    pub fn has_use(&self, use_id: UseId) -> bool {
        self.use_by_id(use_id).is_some()
    }

    /// All uses in order.
    pub fn uses(&self) -> &[BehaviorUse] {
        &self.behavior_uses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BehaviorId;

    fn embedded_use() -> BehaviorUse {
        BehaviorUse::new(BehaviorUri::Embedded(BehaviorId::new()))
    }

    #[test]
    fn test_add_and_delete_use() {
        let mut brain = Brain::new();
        let a = embedded_use();
        let b = embedded_use();
        let a_id = a.id;

        brain.add_use(a);
        brain.add_use(b);
        assert_eq!(brain.uses().len(), 2);
        assert!(brain.has_use(a_id));

        assert!(brain.delete_use(a_id));
        assert!(!brain.has_use(a_id));
        assert_eq!(brain.uses().len(), 1);

        // Deleting again is a no-op.
        assert!(!brain.delete_use(a_id));
    }

    #[test]
    fn test_set_use_preserves_order() {
        let mut brain = Brain::new();
        let a = embedded_use();
        let mut b = embedded_use();
        let b_id = b.id;
        brain.add_use(a);
        brain.add_use(b.clone());

        b.metadata_json = Some("{}".to_string());
        assert!(brain.set_use(b));

        assert_eq!(brain.uses()[1].id, b_id);
        assert_eq!(brain.uses()[1].metadata_json.as_deref(), Some("{}"));
    }

    #[test]
    fn test_set_use_unknown_id() {
        let mut brain = Brain::new();
        assert!(!brain.set_use(embedded_use()));
    }

    #[test]
    fn test_assignments_unique_by_name() {
        let mut use_ = embedded_use();
        use_.set_assignment("speed", serde_json::json!(1.0));
        use_.set_assignment("speed", serde_json::json!(2.0));
        use_.set_assignment("target", serde_json::json!("nobody"));

        assert_eq!(use_.property_assignments.len(), 2);
        assert_eq!(use_.assignment("speed").unwrap().value, serde_json::json!(2.0));
    }
}
