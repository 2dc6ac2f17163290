//! Behavior URI scheme - the three address spaces a use may point into.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::model::BehaviorId;

const EMBEDDED_SCHEME: &str = "embedded";
const BUILTIN_SCHEME: &str = "builtin";
const USER_LIBRARY_SCHEME: &str = "userlib";

/// Address of a behavior.
///
/// Three disjoint forms: `embedded:<id>` resolves through the store,
/// `builtin:<name>` through the static builtin catalog, and
/// `userlib:<file>` through the per-installation user library. A saved
/// world only ever contains the first two; user-library behaviors are
/// imported (copied into the store) when added to a brain, so worlds stay
/// self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BehaviorUri {
    Embedded(BehaviorId),
    Builtin(String),
    UserLibrary(String),
}

impl BehaviorUri {
    /// Build an embedded URI for a behavior ID.
    pub fn embedded(id: BehaviorId) -> Self {
        BehaviorUri::Embedded(id)
    }

    /// Build a builtin URI for a catalog name.
    pub fn builtin(name: impl Into<String>) -> Self {
        BehaviorUri::Builtin(name.into())
    }

    /// Build a user-library URI for a library file name.
    pub fn user_library(file: impl Into<String>) -> Self {
        BehaviorUri::UserLibrary(file.into())
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, BehaviorUri::Embedded(_))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, BehaviorUri::Builtin(_))
    }

    pub fn is_user_library(&self) -> bool {
        matches!(self, BehaviorUri::UserLibrary(_))
    }

    /// The embedded behavior ID, if this is an embedded URI.
    pub fn behavior_id(&self) -> Option<BehaviorId> {
        match self {
            BehaviorUri::Embedded(id) => Some(*id),
            _ => None,
        }
    }

    /// `true` for the forms allowed in a saved world.
    pub fn is_persistable(&self) -> bool {
        !self.is_user_library()
    }
}

impl std::fmt::Display for BehaviorUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BehaviorUri::Embedded(id) => write!(f, "{}:{}", EMBEDDED_SCHEME, id),
            BehaviorUri::Builtin(name) => write!(f, "{}:{}", BUILTIN_SCHEME, name),
            BehaviorUri::UserLibrary(file) => write!(f, "{}:{}", USER_LIBRARY_SCHEME, file),
        }
    }
}

/// Error for a string that is not a recognizable behavior URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid behavior URI: {0}")]
pub struct ParseUriError(pub String);

impl FromStr for BehaviorUri {
    type Err = ParseUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| ParseUriError(s.to_string()))?;
        if rest.is_empty() {
            return Err(ParseUriError(s.to_string()));
        }
        match scheme {
            EMBEDDED_SCHEME => {
                let uuid = Uuid::parse_str(rest).map_err(|_| ParseUriError(s.to_string()))?;
                Ok(BehaviorUri::Embedded(BehaviorId(uuid)))
            }
            BUILTIN_SCHEME => Ok(BehaviorUri::Builtin(rest.to_string())),
            USER_LIBRARY_SCHEME => Ok(BehaviorUri::UserLibrary(rest.to_string())),
            _ => Err(ParseUriError(s.to_string())),
        }
    }
}

// Serialized as the textual form so saved worlds stay readable.

impl Serialize for BehaviorUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BehaviorUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let uris = [
            BehaviorUri::embedded(BehaviorId::new()),
            BehaviorUri::builtin("Default Behavior"),
            BehaviorUri::user_library("chase.js"),
        ];
        for uri in uris {
            let parsed: BehaviorUri = uri.to_string().parse().unwrap();
            assert_eq!(parsed, uri);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<BehaviorUri>().is_err());
        assert!("no-scheme".parse::<BehaviorUri>().is_err());
        assert!("builtin:".parse::<BehaviorUri>().is_err());
        assert!("embedded:not-a-uuid".parse::<BehaviorUri>().is_err());
        assert!("ftp:whatever".parse::<BehaviorUri>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let uri = BehaviorUri::builtin("Spin");
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"builtin:Spin\"");

        let back: BehaviorUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }

    #[test]
    fn test_persistable_forms() {
        assert!(BehaviorUri::embedded(BehaviorId::new()).is_persistable());
        assert!(BehaviorUri::builtin("x").is_persistable());
        assert!(!BehaviorUri::user_library("x.js").is_persistable());
    }
}
