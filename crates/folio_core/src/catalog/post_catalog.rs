use super::random::RandomSource;
use crate::model::post::{EntryRejection, PostRecord, RawPostEntry, Slug};
use crate::source::{PostSource, SourceResult};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Raw entry dropped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the input sequence.
    pub position: usize,
    pub reason: EntryRejection,
}

/// Warnings recorded while building a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: Vec<SkippedEntry>,
    /// Slugs whose earlier entry was replaced by a later duplicate.
    pub overwritten_slugs: Vec<Slug>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.overwritten_slugs.is_empty()
    }
}

/// Category name with its post count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub post_count: usize,
}

/// Immutable, deterministic view of all posts.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Vec<PostRecord>,
    slug_index: HashMap<Slug, usize>,
    /// Category -> positions into `posts`, in catalog order.
    categories: BTreeMap<String, Vec<usize>>,
    report: LoadReport,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from untrusted entries.
    ///
    /// Entries missing `slug` are skipped and recorded in the load report;
    /// untitled entries take their slug as title. Entries without a parsable
    /// date get `fallback_date`.
    /// Never fails.
    pub fn load<I>(entries: I, fallback_date: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = RawPostEntry>,
    {
        let started_at = Instant::now();
        let mut report = LoadReport::default();
        let mut by_slug: HashMap<Slug, PostRecord> = HashMap::new();
        let mut input_count = 0_usize;

        for (position, raw) in entries.into_iter().enumerate() {
            input_count += 1;
            match PostRecord::from_raw(&raw, fallback_date) {
                Ok(record) => {
                    let slug = record.slug.clone();
                    if by_slug.insert(slug.clone(), record).is_some() {
                        debug!(
                            "event=catalog_duplicate module=catalog status=overwritten slug={slug}"
                        );
                        report.overwritten_slugs.push(slug);
                    }
                }
                Err(reason) => {
                    warn!(
                        "event=catalog_entry module=catalog status=skipped position={} reason={}",
                        position,
                        reason.code()
                    );
                    report.skipped.push(SkippedEntry { position, reason });
                }
            }
        }

        let mut posts: Vec<PostRecord> = by_slug.into_values().collect();
        posts.sort_by(catalog_order);

        let mut slug_index = HashMap::with_capacity(posts.len());
        let mut categories: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, post) in posts.iter().enumerate() {
            slug_index.insert(post.slug.clone(), position);
            categories
                .entry(post.category.clone())
                .or_default()
                .push(position);
        }

        info!(
            "event=catalog_load module=catalog status=ok input={} posts={} skipped={} overwritten={} categories={} duration_ms={}",
            input_count,
            posts.len(),
            report.skipped.len(),
            report.overwritten_slugs.len(),
            categories.len(),
            started_at.elapsed().as_millis()
        );

        Self {
            posts,
            slug_index,
            categories,
            report,
        }
    }

    /// Fetches the index from `source` and builds a new catalog.
    ///
    /// # Errors
    /// - Returns the source error unchanged when the index fetch fails.
    pub fn fetch<S>(source: &S, fallback_date: DateTime<Utc>) -> SourceResult<Self>
    where
        S: PostSource + ?Sized,
    {
        match source.fetch_index() {
            Ok(entries) => Ok(Self::load(entries, fallback_date)),
            Err(err) => {
                error!("event=catalog_fetch module=catalog status=error error={err}");
                Err(err)
            }
        }
    }

    /// Replaces this catalog with a freshly fetched one.
    ///
    /// On source failure the current contents stay in place.
    pub fn reload_from<S>(&mut self, source: &S, fallback_date: DateTime<Utc>) -> SourceResult<()>
    where
        S: PostSource + ?Sized,
    {
        *self = Self::fetch(source, fallback_date)?;
        Ok(())
    }

    /// All posts in catalog order.
    pub fn all(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts of one category in catalog order; empty for unknown categories.
    pub fn by_category(&self, category: &str) -> Vec<&PostRecord> {
        self.categories
            .get(category)
            .map(|positions| positions.iter().map(|&idx| &self.posts[idx]).collect())
            .unwrap_or_default()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&PostRecord> {
        self.position_of(slug).map(|idx| &self.posts[idx])
    }

    /// Position of `slug` in catalog order.
    pub fn position_of(&self, slug: &str) -> Option<usize> {
        self.slug_index.get(slug.trim()).copied()
    }

    /// Newest post, or `None` for an empty catalog.
    pub fn most_recent(&self) -> Option<&PostRecord> {
        self.posts.first()
    }

    /// Uniform pick over all posts, or `None` for an empty catalog.
    pub fn random(&self, source: &mut dyn RandomSource) -> Option<&PostRecord> {
        if self.posts.is_empty() {
            return None;
        }
        let index = source.pick_index(self.posts.len()) % self.posts.len();
        self.posts.get(index)
    }

    /// Categories sorted by name, with post counts.
    pub fn categories(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|(name, positions)| CategorySummary {
                name: name.clone(),
                post_count: positions.len(),
            })
            .collect()
    }

    /// Warnings recorded by the load that built this catalog.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

fn catalog_order(left: &PostRecord, right: &PostRecord) -> Ordering {
    right
        .date
        .cmp(&left.date)
        .then_with(|| left.slug.cmp(&right.slug))
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::catalog::RandomSource;
    use crate::model::post::{EntryRejection, RawPostEntry};
    use chrono::{TimeZone, Utc};

    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn pick_index(&mut self, _upper: usize) -> usize {
            self.0
        }
    }

    fn fallback() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn skipped_entries_keep_their_input_position() {
        let catalog = Catalog::load(
            vec![
                RawPostEntry::new("a", "A"),
                RawPostEntry {
                    slug: Some("b".to_string()),
                    ..RawPostEntry::default()
                },
                RawPostEntry {
                    title: Some("no slug".to_string()),
                    ..RawPostEntry::default()
                },
                RawPostEntry::default(),
            ],
            fallback(),
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_slug("b").unwrap().title, "b");
        let skipped = &catalog.report().skipped;
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].position, 2);
        assert_eq!(skipped[0].reason, EntryRejection::MissingSlug);
        assert_eq!(skipped[1].position, 3);
        assert_eq!(skipped[1].reason, EntryRejection::MissingSlug);
    }

    #[test]
    fn random_wraps_out_of_range_picks() {
        let catalog = Catalog::load(
            vec![
                RawPostEntry::new("a", "A").dated("2024-01-02"),
                RawPostEntry::new("b", "B").dated("2024-01-01"),
            ],
            fallback(),
        );
        assert_eq!(catalog.random(&mut Fixed(1)).unwrap().slug, "b");
        assert_eq!(catalog.random(&mut Fixed(2)).unwrap().slug, "a");
        assert!(Catalog::new().random(&mut Fixed(0)).is_none());
    }

    #[test]
    fn lookups_trim_the_requested_slug() {
        let catalog = Catalog::load(vec![RawPostEntry::new(" a ", "A")], fallback());
        assert_eq!(catalog.position_of("a"), Some(0));
        assert!(catalog.by_slug("  a").is_some());
    }
}
