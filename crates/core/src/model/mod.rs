mod bookmark;
mod category;
mod ids;

pub use ids::{CardId, CategoryCode, ParseIdError};

pub use bookmark::{BookmarkableEntity, EntityKind, EntityKindError, TogglePhase, ToggleState};
pub use category::{AggregatedNode, AggregatedProgress, CategoryNode, ProgressRecord};
