use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityKindError {
    #[error("unknown entity kind: {0}")]
    Unknown(String),
}

//
// ─── ENTITY KIND ──────────────────────────────────────────────────────────────
//

/// Which family of remote bookmark endpoints applies to an entity.
///
/// - `Public`: cards from the shared catalog
/// - `UserOwned`: cards the signed-in user created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Public,
    UserOwned,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Public => "public",
            EntityKind::UserOwned => "user_owned",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Self::Public),
            "user_owned" | "user-owned" => Ok(Self::UserOwned),
            other => Err(EntityKindError::Unknown(other.to_owned())),
        }
    }
}

//
// ─── BOOKMARKABLE ENTITY ──────────────────────────────────────────────────────
//

/// A card that can be bookmarked, tagged with its endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookmarkableEntity {
    pub id: CardId,
    pub kind: EntityKind,
}

impl BookmarkableEntity {
    #[must_use]
    pub fn new(id: CardId, kind: EntityKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub fn public(id: CardId) -> Self {
        Self::new(id, EntityKind::Public)
    }

    #[must_use]
    pub fn user_owned(id: CardId) -> Self {
        Self::new(id, EntityKind::UserOwned)
    }
}

//
// ─── TOGGLE STATE ─────────────────────────────────────────────────────────────
//

/// Lifecycle of a single optimistic bookmark toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TogglePhase {
    /// Nothing has been toggled yet.
    #[default]
    Idle,
    /// A remote add/remove is in flight; the visible value is a prediction.
    Pending,
    /// The last toggle was confirmed by the server.
    Settled,
    /// The last toggle failed and the visible value was restored.
    RolledBack,
}

impl TogglePhase {
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, TogglePhase::Pending)
    }
}

/// Snapshot of what a bookmark control should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleState {
    pub is_bookmarked: bool,
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_parses_both_spellings() {
        assert_eq!("public".parse::<EntityKind>(), Ok(EntityKind::Public));
        assert_eq!("user_owned".parse::<EntityKind>(), Ok(EntityKind::UserOwned));
        assert_eq!("user-owned".parse::<EntityKind>(), Ok(EntityKind::UserOwned));
        assert!("private".parse::<EntityKind>().is_err());
    }

    #[test]
    fn entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::UserOwned).unwrap();
        assert_eq!(json, "\"user_owned\"");
    }
}
