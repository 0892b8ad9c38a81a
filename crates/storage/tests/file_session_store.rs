use storage::{FileSessionStore, SessionStore, StorageError};

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));
    assert_eq!(store.get("navigation_history").await.expect("get"), None);
    store.remove("navigation_history").await.expect("remove");
    assert!(!store.path().exists());
}

#[tokio::test]
async fn writes_are_visible_to_a_fresh_handle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    let first = FileSessionStore::new(&path);
    first.set("a", "1").await.expect("set a");
    first.set("b", "2").await.expect("set b");

    let second = FileSessionStore::new(&path);
    assert_eq!(second.get("a").await.expect("get").as_deref(), Some("1"));

    second.remove("a").await.expect("remove");
    assert_eq!(first.get("a").await.expect("get"), None);
    assert_eq!(first.get("b").await.expect("get").as_deref(), Some("2"));
}

#[tokio::test]
async fn corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, "not json").await.expect("write");

    let store = FileSessionStore::new(&path);
    let err = store.get("a").await.expect_err("corrupt file");
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn write_after_corruption_repairs_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, "{\"navigation_history\": [").await.expect("write");

    let store = FileSessionStore::new(&path);
    store
        .set("navigation_history", "[\"/decks\"]")
        .await
        .expect("set repairs corrupt file");
    assert_eq!(
        store.get("navigation_history").await.expect("get").as_deref(),
        Some("[\"/decks\"]")
    );
}

#[tokio::test]
async fn remove_after_corruption_leaves_a_readable_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, "garbage").await.expect("write");

    let store = FileSessionStore::new(&path);
    store.remove("navigation_history").await.expect("remove");
    assert_eq!(store.get("navigation_history").await.expect("get"), None);
}
