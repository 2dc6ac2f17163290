//! Read-only behavior catalogs supplied by the hosting runtime.

use crate::model::Behavior;

/// The static catalog of built-in behaviors. Built-ins are shipped with the
/// runtime and never persisted in the store; `builtin:` URIs resolve through
/// this at use-resolution time.
pub trait BuiltinCatalog {
    /// Resolve a builtin name to its behavior content.
    fn resolve(&self, name: &str) -> Option<Behavior>;

    /// `true` if the catalog contains the given name.
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

/// The per-installation user behavior library. Consulted only at import
/// time: a `userlib:` URI must be copied into the store as a new embedded
/// behavior before a brain may reference it.
pub trait UserLibrary {
    /// Resolve a library file name to its behavior content.
    fn resolve(&self, file: &str) -> Option<Behavior>;
}
