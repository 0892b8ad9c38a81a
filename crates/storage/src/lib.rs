#![forbid(unsafe_code)]

pub mod file;
pub mod repository;
pub mod sqlite;

pub use file::FileSessionStore;
pub use repository::{InMemorySessionStore, SessionStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteSessionStore};
