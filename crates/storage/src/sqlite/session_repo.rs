use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{SessionStore, StorageError};

use super::SqliteSessionStore;

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM session_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO session_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_replaces_value() {
        let store = SqliteSessionStore::in_memory().await.expect("open");
        store.set("navigation_history", "[\"/a\"]").await.unwrap();
        store.set("navigation_history", "[\"/b\"]").await.unwrap();
        assert_eq!(
            store.get("navigation_history").await.unwrap().as_deref(),
            Some("[\"/b\"]")
        );
    }

    #[tokio::test]
    async fn remove_deletes_key_and_is_idempotent() {
        let store = SqliteSessionStore::in_memory().await.expect("open");
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn migrations_can_run_twice() {
        let store = SqliteSessionStore::in_memory().await.expect("open");
        store.migrate().await.expect("second migrate");
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn separate_stores_do_not_share_entries() {
        let a = SqliteSessionStore::in_memory().await.expect("open a");
        let b = SqliteSessionStore::in_memory().await.expect("open b");
        a.set("k", "v").await.unwrap();
        assert_eq!(b.get("k").await.unwrap(), None);
    }
}
