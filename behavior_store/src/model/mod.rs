//! Entity model: opaque identifiers, behaviors, brains, and uses.

mod behavior;
mod brain;

pub use behavior::*;
pub use brain::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorId(pub Uuid);

impl BehaviorId {
    /// Create a new random behavior ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a behavior ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BehaviorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrainId(pub Uuid);

impl BrainId {
    /// The well-known ID of the shared default brain assigned to freshly
    /// spawned actors. Editing an actor whose brain is this one clones it
    /// first (copy-on-write).
    pub const DEFAULT: BrainId = BrainId(Uuid::nil());

    /// Create a new random brain ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// `true` if this is the shared default brain.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for BrainId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BrainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one behavior use. Only unique within its owning brain,
/// not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UseId(pub Uuid);

impl UseId {
    /// Create a new random use ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an actor. Actors live in an external directory; the store
/// only ever holds their IDs (in actor-reference property values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil actor ID, used as the zero value for unset actor references.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brain_id_is_stable() {
        assert_eq!(BrainId::DEFAULT, BrainId(Uuid::nil()));
        assert!(BrainId::DEFAULT.is_default());
        assert!(!BrainId::new().is_default());
    }

    #[test]
    fn test_fresh_ids_are_distinct() {
        assert_ne!(BehaviorId::new(), BehaviorId::new());
        assert_ne!(UseId::new(), UseId::new());
    }
}
