//! # Behavior Store
//!
//! The "Card Catalog" crate - an addressable database of behaviors (small,
//! independently editable script fragments) and brains (ordered collections of
//! behavior uses that define an actor's logic), together with the property
//! assignment codec and the reachability-based garbage collector.
//!
//! This crate holds purely local data structures. Editing policy, undo, and
//! script dispatch live in `brain_editing`.

pub mod catalog;
pub mod error;
pub mod model;
pub mod props;
pub mod store;
pub mod uri;

pub use catalog::*;
pub use error::*;
pub use model::*;
pub use props::*;
pub use store::*;
pub use uri::*;
