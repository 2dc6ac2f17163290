//! # Brain Editing
//!
//! The "Workbench" crate - editing policy on top of `behavior_store`.
//! Provides the copy-on-write [`BrainEditor`], undo scopes and the bounded
//! [`UndoStack`], and the [`ScriptingHost`] aggregate that wires the store to
//! the hosting runtime's actor directory and script engine.
//!
//! The hosting runtime plugs in through the collaborator traits
//! ([`ActorDirectory`], [`ScriptRuntime`]); this crate never talks to a real
//! engine or interpreter directly.

pub mod collaborators;
pub mod editor;
pub mod error;
pub mod host;
pub mod undo;

pub use collaborators::*;
pub use editor::*;
pub use error::*;
pub use host::*;
pub use undo::*;

#[cfg(test)]
pub(crate) mod testing;
