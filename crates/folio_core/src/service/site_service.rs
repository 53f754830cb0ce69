//! Site context service.
//!
//! # Responsibility
//! - Own the post source, current catalog, navigation state and store.
//! - Provide reload, open, restore, site-map and preference use-cases.
//!
//! # Invariants
//! - Collaborators are passed in at construction; nothing is looked up
//!   globally.
//! - A failed reload keeps the previous catalog and navigation pointer.
//! - Reloads take `&mut self`, so at most one reload runs at a time and the
//!   last completed reload is the one that is visible.

use crate::catalog::{Catalog, LoadReport, RandomSource};
use crate::model::post::{PostRecord, Slug};
use crate::navigation::NavigationState;
use crate::report::{CoreEvent, Reporter};
use crate::service::preview::{summarize_post, PostSummary};
use crate::service::theme::ThemePreference;
use crate::source::{PostSource, SourceError};
use crate::store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for site use-cases.
#[derive(Debug)]
pub enum SiteError {
    /// Slug is not present in the current catalog.
    UnknownSlug(String),
    /// The post source failed.
    Source(SourceError),
    /// The preference store failed.
    Store(StoreError),
}

impl Display for SiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSlug(slug) => write!(f, "unknown post: {slug}"),
            Self::Source(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SiteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownSlug(_) => None,
            Self::Source(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<SourceError> for SiteError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<StoreError> for SiteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One post row in the site map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMapEntry {
    pub slug: Slug,
    pub title: String,
    pub date: DateTime<Utc>,
    /// `true` for the post the viewer is currently on.
    pub is_current: bool,
}

/// One category block in the site map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMapSection {
    pub category: String,
    /// Posts in catalog order.
    pub posts: Vec<SiteMapEntry>,
}

/// Explicit site context.
pub struct Site<S: PostSource> {
    source: S,
    navigation: NavigationState,
    store: Arc<dyn KeyValueStore>,
    reporter: Arc<dyn Reporter>,
    generation: u64,
}

impl<S: PostSource> Site<S> {
    /// Creates a site with an empty catalog. Call `reload` to populate it.
    pub fn new(source: S, store: Arc<dyn KeyValueStore>, reporter: Arc<dyn Reporter>) -> Self {
        let navigation = NavigationState::new(
            Arc::new(Catalog::new()),
            Arc::clone(&store),
            Arc::clone(&reporter),
        );
        Self {
            source,
            navigation,
            store,
            reporter,
            generation: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn catalog(&self) -> &Catalog {
        self.navigation.catalog()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationState {
        &mut self.navigation
    }

    /// Number of successful reloads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuilds the catalog from the source.
    ///
    /// Skipped entries are forwarded to the reporter as `MalformedEntry`.
    ///
    /// # Errors
    /// - `SiteError::Source` when the index fetch fails; the previous
    ///   catalog stays in place and `SourceUnavailable` is reported.
    pub fn reload(&mut self, fallback_date: DateTime<Utc>) -> Result<&LoadReport, SiteError> {
        let catalog = Catalog::fetch(&self.source, fallback_date).map_err(|err| {
            self.reporter.report(&CoreEvent::SourceUnavailable {
                message: err.to_string(),
            });
            SiteError::Source(err)
        })?;

        for skipped in &catalog.report().skipped {
            self.reporter.report(&CoreEvent::MalformedEntry {
                position: skipped.position,
                reason: skipped.reason,
            });
        }

        self.navigation.rebind(Arc::new(catalog));
        self.generation += 1;
        info!(
            "event=site_reload module=service status=ok generation={} posts={}",
            self.generation,
            self.catalog().len()
        );
        Ok(self.catalog().report())
    }

    /// Fetches the full post, makes it current and persists it as last
    /// viewed.
    ///
    /// Catalog metadata (title, date, category) wins over the fetched
    /// entry; only `content` is taken from the fetch.
    pub fn open_post(&mut self, slug: &str) -> Result<PostRecord, SiteError> {
        let Some(mut record) = self.catalog().by_slug(slug).cloned() else {
            self.reporter.report(&CoreEvent::UnknownSlug {
                slug: slug.to_string(),
                operation: "open_post",
            });
            return Err(SiteError::UnknownSlug(slug.trim().to_string()));
        };

        let fetched = self.source.fetch_post(&record.slug).map_err(|err| {
            self.reporter.report(&CoreEvent::SourceUnavailable {
                message: err.to_string(),
            });
            SiteError::Source(err)
        })?;
        if fetched.content.is_some() {
            record.content = fetched.content;
        }

        self.navigation.set_current(&record.slug);
        Ok(record)
    }

    /// Restores the last viewed post from the store.
    pub fn restore_last_viewed(&mut self) -> Option<&PostRecord> {
        self.navigation.restore_from_store();
        self.navigation.current()
    }

    /// Newest post; reports `EmptyCatalog` when there is none.
    pub fn most_recent(&self) -> Option<&PostRecord> {
        let post = self.catalog().most_recent();
        if post.is_none() {
            self.report_empty("most_recent");
        }
        post
    }

    /// Random post; reports `EmptyCatalog` when there is none.
    pub fn random_post(&self, rng: &mut dyn RandomSource) -> Option<&PostRecord> {
        let post = self.catalog().random(rng);
        if post.is_none() {
            self.report_empty("random_post");
        }
        post
    }

    /// Category sections in name order, current post flagged.
    pub fn site_map(&self) -> Vec<SiteMapSection> {
        let current = self.navigation.current_slug();
        self.catalog()
            .categories()
            .into_iter()
            .map(|category| SiteMapSection {
                posts: self
                    .catalog()
                    .by_category(&category.name)
                    .into_iter()
                    .map(|post| SiteMapEntry {
                        slug: post.slug.clone(),
                        title: post.title.clone(),
                        date: post.date,
                        is_current: current == Some(post.slug.as_str()),
                    })
                    .collect(),
                category: category.name,
            })
            .collect()
    }

    /// Listing rows for every post in catalog order.
    pub fn summaries(&self) -> Vec<PostSummary> {
        self.catalog().all().iter().map(summarize_post).collect()
    }

    pub fn theme(&self) -> ThemePreference {
        ThemePreference::load(self.store.as_ref(), self.reporter.as_ref())
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<(), SiteError> {
        theme.save(self.store.as_ref())?;
        Ok(())
    }

    fn report_empty(&self, operation: &'static str) {
        self.reporter.report(&CoreEvent::EmptyCatalog { operation });
    }
}
