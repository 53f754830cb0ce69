//! Static-file post source.
//!
//! Layout under `root`:
//! - `<index_file>`: JSON array of raw entries.
//! - `<posts_dir>/<slug>.json`: one raw entry with `content`.

use super::{PostSource, SourceError, SourceResult};
use crate::config::SiteConfig;
use crate::model::post::RawPostEntry;
use chrono::{DateTime, Utc};
use log::debug;
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_FILE: &str = "index.json";
pub const DEFAULT_POSTS_DIR: &str = "posts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsPostSource {
    root: PathBuf,
    index_file: String,
    posts_dir: String,
}

impl FsPostSource {
    /// Creates a source using the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, DEFAULT_INDEX_FILE, DEFAULT_POSTS_DIR)
    }

    pub fn with_layout(
        root: impl Into<PathBuf>,
        index_file: impl Into<String>,
        posts_dir: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
            posts_dir: posts_dir.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::with_layout(
            config.content_root.clone(),
            config.index_file.clone(),
            config.posts_dir.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Path of the full post file for `slug`, or `None` when the slug could
    /// escape the posts directory.
    pub fn post_path(&self, slug: &str) -> Option<PathBuf> {
        let slug = slug.trim();
        if !is_path_safe(slug) {
            return None;
        }
        Some(self.root.join(&self.posts_dir).join(format!("{slug}.json")))
    }

    /// Modification time of the index file.
    ///
    /// Used as the date fallback for entries without a usable date.
    pub fn index_modified_at(&self) -> Option<DateTime<Utc>> {
        std::fs::metadata(self.index_path())
            .and_then(|metadata| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

impl PostSource for FsPostSource {
    fn fetch_index(&self) -> SourceResult<Vec<RawPostEntry>> {
        let path = self.index_path();
        let value = read_json(&path)?;
        let serde_json::Value::Array(items) = value else {
            return Err(SourceError::InvalidIndex(path));
        };
        debug!(
            "event=index_fetch module=source status=ok entries={}",
            items.len()
        );
        Ok(items.into_iter().map(RawPostEntry::from_json_value).collect())
    }

    fn fetch_post(&self, slug: &str) -> SourceResult<RawPostEntry> {
        let path = self
            .post_path(slug)
            .ok_or_else(|| SourceError::NotFound(slug.to_string()))?;
        if !path.is_file() {
            return Err(SourceError::NotFound(slug.trim().to_string()));
        }
        let mut entry = RawPostEntry::from_json_value(read_json(&path)?);
        if entry.slug.is_none() {
            entry.slug = Some(slug.trim().to_string());
        }
        Ok(entry)
    }
}

fn read_json(path: &Path) -> SourceResult<serde_json::Value> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn is_path_safe(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
}
