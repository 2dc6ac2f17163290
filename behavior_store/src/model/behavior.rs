//! Behavior definitions - stored units of script source.

use serde::{Deserialize, Serialize};

/// A named unit of script source plus opaque UI metadata.
///
/// Behaviors are owned exclusively by the store and addressed by
/// [`BehaviorId`](super::BehaviorId). They never reference the brains that
/// use them; that edge only exists in the other direction, which is what
/// garbage collection walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Behavior {
    /// Human-readable label. Not the ID.
    pub label: String,

    /// The committed script source.
    pub source: String,

    /// Source the user is still editing, not yet committed.
    /// `None` means there is no pending draft.
    #[serde(default)]
    pub draft_source: Option<String>,

    /// Opaque UI-authored metadata blob.
    #[serde(default)]
    pub metadata_json: Option<String>,
}

impl Behavior {
    /// Create a new behavior with the given label and source.
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            draft_source: None,
            metadata_json: None,
        }
    }

    /// Attach a metadata blob.
    pub fn with_metadata(mut self, metadata_json: impl Into<String>) -> Self {
        self.metadata_json = Some(metadata_json.into());
        self
    }

    /// The human-readable text of the leading `//` comment line of the
    /// source, if there is one. Used as a fallback display name.
    pub fn inline_summary(&self) -> Option<&str> {
        let first = self.source.lines().next()?;
        let text = first.strip_prefix("//")?.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// `true` if this behavior has uncommitted draft source.
    pub fn has_draft(&self) -> bool {
        self.draft_source.is_some()
    }
}
