//! Core domain logic for the Folio blog.
//! This crate owns the post catalog and viewer navigation contracts.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod report;
pub mod service;
pub mod source;
pub mod store;

pub use catalog::{Catalog, CategorySummary, LoadReport, RandomSource, RngSource, SkippedEntry};
pub use config::{ConfigError, SiteConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::post::{
    parse_post_date, EntryRejection, PostRecord, RawPostEntry, Slug, DEFAULT_CATEGORY,
};
pub use navigation::{Adjacent, NavigationPhase, NavigationState};
pub use report::{CoreEvent, LogReporter, MemoryReporter, Reporter};
pub use service::preview::{derive_markdown_preview, summarize_post, MarkdownPreview, PostSummary};
pub use service::site_service::{Site, SiteError, SiteMapEntry, SiteMapSection};
pub use service::theme::ThemePreference;
pub use source::{FsPostSource, MemoryPostSource, PostSource, SourceError, SourceResult};
pub use store::{
    KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult, LAST_VIEWED_KEY, THEME_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
