use std::sync::Arc;

use services::NavigationHistory;
use storage::SqliteSessionStore;

#[tokio::test]
async fn history_survives_within_one_sqlite_session() {
    let store = SqliteSessionStore::in_memory().await.expect("open store");
    let history = NavigationHistory::new(Arc::new(store.clone()));

    history.push("/").await;
    history.push("/decks").await;
    history.push("/decks/3").await;
    history.push("/decks/3").await;

    let reopened = NavigationHistory::new(Arc::new(store));
    assert_eq!(reopened.entries().await, vec!["/", "/decks", "/decks/3"]);
    assert_eq!(reopened.pop_previous("/decks/3").await.as_deref(), Some("/decks"));
    assert_eq!(history.entries().await, vec!["/", "/decks"]);
}

#[tokio::test]
async fn history_in_file_store_is_shared_between_handles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    NavigationHistory::new(Arc::new(storage::FileSessionStore::new(&path)))
        .push("/practice")
        .await;
    let history = NavigationHistory::new(Arc::new(storage::FileSessionStore::new(&path)));
    assert_eq!(history.peek().await.as_deref(), Some("/practice"));
}
