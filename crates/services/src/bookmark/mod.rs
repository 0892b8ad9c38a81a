//! Bookmark membership for cards: the remote service contract and the
//! per-card optimistic toggle built on top of it.

mod client;
mod toggle;

pub use client::{BookmarkService, HttpBookmarkService};
pub use toggle::{BookmarkToggle, DisposeGuard, ToggleCallback, ToggleOutcome};
