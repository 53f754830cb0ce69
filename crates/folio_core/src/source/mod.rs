//! Post source collaborator.
//!
//! # Responsibility
//! - Define how core fetches the post index and individual posts.
//! - Provide a static-file implementation and an in-memory fixture.
//!
//! # Invariants
//! - Sources return raw, unvalidated entries; normalization belongs to the
//!   catalog.
//! - A source error never mutates core state by itself.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod fs;
mod memory;

pub use fs::{FsPostSource, DEFAULT_INDEX_FILE, DEFAULT_POSTS_DIR};
pub use memory::MemoryPostSource;

use crate::model::post::RawPostEntry;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The index decoded but is not a JSON array.
    InvalidIndex(PathBuf),
    /// No post exists for the requested slug.
    NotFound(String),
    /// The source is reachable in principle but refused this request.
    Unavailable(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read `{}`: {source}", path.display()),
            Self::Decode { path, source } => {
                write!(f, "failed to decode `{}`: {source}", path.display())
            }
            Self::InvalidIndex(path) => {
                write!(f, "post index `{}` must be a JSON array", path.display())
            }
            Self::NotFound(slug) => write!(f, "post not found: {slug}"),
            Self::Unavailable(message) => write!(f, "post source unavailable: {message}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fetch collaborator for post data.
pub trait PostSource {
    /// Fetches every entry listed in the post index.
    fn fetch_index(&self) -> SourceResult<Vec<RawPostEntry>>;
    /// Fetches one full post, including `content`.
    fn fetch_post(&self, slug: &str) -> SourceResult<RawPostEntry>;
}
