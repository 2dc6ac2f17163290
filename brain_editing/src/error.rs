//! Error type for editing operations.

use behavior_store::{ActorId, StoreError};
use thiserror::Error;

/// Errors raised by brain editors and undo replay.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The actor belongs to another participant; only locally owned actors
    /// may be edited.
    #[error("actor {0} is not locally owned")]
    Unauthorized(ActorId),

    /// The world moved on under the editor - the actor, brain, or use it
    /// pointed at no longer exists.
    #[error("editor is no longer valid: {0}")]
    InvalidState(String),

    /// A store or codec failure surfaced through an edit.
    #[error(transparent)]
    Store(#[from] StoreError),
}
