//! Post catalog: the sorted, categorized view of all posts.
//!
//! # Responsibility
//! - Normalize raw index entries into one deterministic post sequence.
//! - Serve slug, category, most-recent and random lookups.
//!
//! # Invariants
//! - Posts are ordered by `date DESC, slug ASC`.
//! - Slugs are unique; a later duplicate replaces an earlier one.
//! - A catalog is immutable once built; reloads replace it wholesale.

mod post_catalog;
mod random;

pub use post_catalog::{Catalog, CategorySummary, LoadReport, SkippedEntry};
pub use random::{RandomSource, RngSource};
