#![forbid(unsafe_code)]

pub mod bookmark;
pub mod config;
pub mod error;
pub mod http;
pub mod navigation;
pub mod progress;

pub use bookmark::{BookmarkService, BookmarkToggle, HttpBookmarkService, ToggleOutcome};
pub use config::ApiConfig;
pub use error::{BookmarkServiceError, ConfigError, ProgressServiceError};
pub use http::ApiClient;
pub use navigation::{MAX_HISTORY_ENTRIES, NavigationHistory};
pub use progress::{
    CategoryProgressSource, HttpProgressSource, ProgressDashboardService, StaticProgressSource,
};
