//! "Go back to the previous logical page" support.
//!
//! Visited route paths are kept as a JSON array in the session store. The
//! stack never fails: unreadable storage reads as an empty stack and failed
//! writes are dropped.

use std::sync::Arc;

use storage::SessionStore;

/// Upper bound on stored entries; the oldest are dropped first.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Session store key holding the stack.
pub const HISTORY_KEY: &str = "navigation_history";

#[derive(Clone)]
pub struct NavigationHistory {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl NavigationHistory {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            key: HISTORY_KEY.to_owned(),
        }
    }

    /// Store the stack under a different key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Record a visit to `path`.
    ///
    /// Empty paths and repeats of the current top are ignored.
    pub async fn push(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        let mut entries = self.read().await;
        if entries.last().is_some_and(|top| top == path) {
            return;
        }
        entries.push(path.to_owned());
        if entries.len() > MAX_HISTORY_ENTRIES {
            let excess = entries.len() - MAX_HISTORY_ENTRIES;
            entries.drain(..excess);
        }
        self.write(&entries).await;
    }

    /// Drop every trailing entry equal to `current_path` and return the page
    /// to go back to, if any.
    pub async fn pop_previous(&self, current_path: &str) -> Option<String> {
        let mut entries = self.read().await;
        while entries.last().is_some_and(|top| top == current_path) {
            entries.pop();
        }
        self.write(&entries).await;
        entries.pop()
    }

    /// All entries, oldest first.
    pub async fn entries(&self) -> Vec<String> {
        self.read().await
    }

    pub async fn peek(&self) -> Option<String> {
        self.read().await.pop()
    }

    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key).await {
            tracing::debug!(key = %self.key, error = %err, "navigation history clear dropped");
        }
    }

    async fn read(&self) -> Vec<String> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "navigation history unreadable");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::debug!(key = %self.key, error = %err, "navigation history corrupt");
            Vec::new()
        })
    }

    async fn write(&self, entries: &[String]) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "navigation history not serializable");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.key, &raw).await {
            tracing::debug!(key = %self.key, error = %err, "navigation history write dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use storage::{InMemorySessionStore, StorageError};

    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }
    }

    fn history() -> (NavigationHistory, InMemorySessionStore) {
        let store = InMemorySessionStore::new();
        (NavigationHistory::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn repeated_push_collapses_to_one_entry() {
        let (once, _) = history();
        once.push("/decks").await;

        let (twice, _) = history();
        twice.push("/decks").await;
        twice.push("/decks").await;

        assert_eq!(once.entries().await, twice.entries().await);
        assert_eq!(twice.entries().await, vec!["/decks".to_string()]);
    }

    #[tokio::test]
    async fn empty_path_is_ignored() {
        let (history, store) = history();
        history.push("").await;
        assert!(history.entries().await.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn non_adjacent_repeats_are_kept() {
        let (history, _) = history();
        for path in ["/a", "/b", "/a"] {
            history.push(path).await;
        }
        assert_eq!(history.entries().await, vec!["/a", "/b", "/a"]);
    }

    #[tokio::test]
    async fn stack_is_bounded_and_keeps_order() {
        let (history, _) = history();
        for i in 0..150 {
            history.push(&format!("/p{i}")).await;
        }
        let entries = history.entries().await;
        assert_eq!(entries.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(entries.first().map(String::as_str), Some("/p50"));
        assert_eq!(entries.last().map(String::as_str), Some("/p149"));
        assert!(entries.windows(2).all(|w| w[0] != w[1]));
    }

    #[tokio::test]
    async fn pop_previous_skips_all_copies_of_current() {
        let (history, store) = history();
        store
            .set(HISTORY_KEY, r#"["/x","/a","/a","/a"]"#)
            .await
            .unwrap();

        assert_eq!(history.pop_previous("/a").await.as_deref(), Some("/x"));
        assert_eq!(history.entries().await, vec!["/x"]);
    }

    #[tokio::test]
    async fn pop_previous_when_current_is_not_on_top() {
        let (history, _) = history();
        history.push("/home").await;
        history.push("/decks").await;

        assert_eq!(history.pop_previous("/settings").await.as_deref(), Some("/decks"));
        assert_eq!(history.peek().await.as_deref(), Some("/decks"));
    }

    #[tokio::test]
    async fn pop_previous_on_empty_stack_returns_none() {
        let (history, _) = history();
        assert_eq!(history.pop_previous("/a").await, None);

        history.push("/a").await;
        assert_eq!(history.pop_previous("/a").await, None);
        assert!(history.entries().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_entry_reads_as_empty() {
        let (history, store) = history();
        store.set(HISTORY_KEY, "{not json").await.unwrap();
        assert!(history.entries().await.is_empty());

        history.push("/a").await;
        assert_eq!(history.entries().await, vec!["/a"]);
    }

    #[tokio::test]
    async fn unavailable_storage_degrades_silently() {
        let history = NavigationHistory::new(Arc::new(UnavailableStore));
        history.push("/a").await;
        assert!(history.entries().await.is_empty());
        assert_eq!(history.pop_previous("/a").await, None);
        history.clear().await;
    }

    #[tokio::test]
    async fn clear_and_custom_key() {
        let store = InMemorySessionStore::new();
        let history = NavigationHistory::new(Arc::new(store.clone())).with_key("study_history");
        history.push("/a").await;
        assert!(store.get("study_history").await.unwrap().is_some());
        assert!(store.get(HISTORY_KEY).await.unwrap().is_none());

        history.clear().await;
        assert!(store.is_empty());
    }
}
