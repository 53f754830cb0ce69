//! Key-value persistence collaborator.
//!
//! # Responsibility
//! - Define the string key-value contract used for viewer preferences.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Keys are trimmed and non-empty.
//! - SQLite stores are fully migrated before first use.
//! - A database with a newer schema version is never opened.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the slug of the last post the viewer opened.
pub const LAST_VIEWED_KEY: &str = "last_viewed_slug";
/// Key holding the viewer's theme preference.
pub const THEME_KEY: &str = "theme";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A previous holder of the store lock panicked.
    LockPoisoned,
    InvalidKey(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            Self::InvalidKey(key) => write!(f, "invalid store key: `{key}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// String key-value store shared by navigation and preferences.
///
/// Receivers are `&self` so one store can sit behind an `Arc` and be used by
/// several components.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never set.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Inserts or replaces the value for `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`; removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

pub(crate) fn normalize_key(key: &str) -> StoreResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
