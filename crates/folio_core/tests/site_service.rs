use chrono::{DateTime, TimeZone, Utc};
use folio_core::{
    FsPostSource, KeyValueStore, MemoryPostSource, MemoryReporter, MemoryStore, NavigationPhase,
    RandomSource, RawPostEntry, Site, SiteError, SqliteStore, ThemePreference, LAST_VIEWED_KEY,
};
use std::sync::Arc;

struct FixedPick(usize);

impl RandomSource for FixedPick {
    fn pick_index(&mut self, _upper: usize) -> usize {
        self.0
    }
}

fn fallback() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn blog_entries() -> Vec<RawPostEntry> {
    vec![
        RawPostEntry::new("welcome", "Welcome")
            .dated("2024-01-01")
            .with_content("Hi ![cover](img/welcome.png) there"),
        RawPostEntry::new("devlog-1", "Devlog 1")
            .dated("2024-02-01")
            .in_category("devlog")
            .with_content("**First** devlog"),
        RawPostEntry::new("devlog-2", "Devlog 2")
            .dated("2024-03-01")
            .in_category("devlog"),
        RawPostEntry {
            title: Some("no slug".to_string()),
            ..RawPostEntry::default()
        },
    ]
}

fn site_with(
    entries: Vec<RawPostEntry>,
) -> (
    Site<MemoryPostSource>,
    Arc<MemoryStore>,
    Arc<MemoryReporter>,
) {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(MemoryReporter::new());
    let site = Site::new(
        MemoryPostSource::new(entries),
        store.clone(),
        reporter.clone(),
    );
    (site, store, reporter)
}

#[test]
fn reload_builds_catalog_and_reports_skipped_entries() {
    let (mut site, _, reporter) = site_with(blog_entries());
    assert_eq!(site.generation(), 0);
    assert!(site.catalog().is_empty());

    let report = site.reload(fallback()).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(site.generation(), 1);
    assert_eq!(site.catalog().len(), 3);
    assert_eq!(reporter.codes(), vec!["malformed_entry"]);
}

#[test]
fn failed_reload_keeps_catalog_and_navigation() {
    let (mut site, _, reporter) = site_with(blog_entries());
    site.reload(fallback()).unwrap();
    site.open_post("welcome").unwrap();

    site.source().set_outage(Some("rate limited"));
    let err = site.reload(fallback()).unwrap_err();
    assert!(matches!(err, SiteError::Source(_)));
    assert_eq!(site.generation(), 1);
    assert_eq!(site.catalog().len(), 3);
    assert_eq!(site.navigation().current_slug(), Some("welcome"));
    assert_eq!(
        reporter.codes().last().copied(),
        Some("source_unavailable")
    );
}

#[test]
fn reload_rebinds_navigation_to_new_catalog() {
    let (mut site, _, _) = site_with(blog_entries());
    site.reload(fallback()).unwrap();
    site.open_post("devlog-1").unwrap();

    site.source()
        .replace_entries(vec![RawPostEntry::new("welcome", "Welcome back")]);
    site.reload(fallback()).unwrap();
    assert_eq!(site.navigation().phase(), NavigationPhase::Unset);
    assert_eq!(site.generation(), 2);
}

#[test]
fn open_post_fetches_content_and_persists_last_viewed() {
    let (mut site, store, _) = site_with(blog_entries());
    site.reload(fallback()).unwrap();

    let post = site.open_post(" devlog-1 ").unwrap();
    assert_eq!(post.content.as_deref(), Some("**First** devlog"));
    assert_eq!(post.category, "devlog");
    assert_eq!(
        store.get(LAST_VIEWED_KEY).unwrap().as_deref(),
        Some("devlog-1")
    );

    let adjacent = site.navigation().adjacent();
    assert_eq!(adjacent.previous.unwrap().slug, "devlog-2");
    assert_eq!(adjacent.next.unwrap().slug, "welcome");
}

#[test]
fn open_post_with_unknown_slug_is_an_error_without_side_effects() {
    let (mut site, store, reporter) = site_with(blog_entries());
    site.reload(fallback()).unwrap();

    let err = site.open_post("missing").unwrap_err();
    assert!(matches!(err, SiteError::UnknownSlug(ref slug) if slug == "missing"));
    assert!(site.navigation().current().is_none());
    assert_eq!(store.get(LAST_VIEWED_KEY).unwrap(), None);
    assert_eq!(
        reporter.codes(),
        vec!["malformed_entry", "unknown_slug"]
    );
}

#[test]
fn restore_last_viewed_uses_persisted_slug() {
    let (mut site, store, _) = site_with(blog_entries());
    store.set(LAST_VIEWED_KEY, "welcome").unwrap();
    site.reload(fallback()).unwrap();

    let restored = site.restore_last_viewed().unwrap();
    assert_eq!(restored.title, "Welcome");
}

#[test]
fn empty_site_reports_empty_catalog() {
    let (mut site, _, reporter) = site_with(Vec::new());
    site.reload(fallback()).unwrap();

    assert!(site.most_recent().is_none());
    assert!(site.random_post(&mut FixedPick(0)).is_none());
    assert!(site.site_map().is_empty());
    assert_eq!(reporter.codes(), vec!["empty_catalog", "empty_catalog"]);
}

#[test]
fn site_map_groups_by_category_and_flags_current() {
    let (mut site, _, _) = site_with(blog_entries());
    site.reload(fallback()).unwrap();
    site.open_post("welcome").unwrap();

    let map = site.site_map();
    let categories: Vec<&str> = map.iter().map(|section| section.category.as_str()).collect();
    assert_eq!(categories, vec!["devlog", "general"]);

    let devlog: Vec<&str> = map[0].posts.iter().map(|entry| entry.slug.as_str()).collect();
    assert_eq!(devlog, vec!["devlog-2", "devlog-1"]);
    assert!(map[0].posts.iter().all(|entry| !entry.is_current));
    assert!(map[1].posts[0].is_current);
}

#[test]
fn summaries_derive_previews_from_loaded_content() {
    let (mut site, _, _) = site_with(blog_entries());
    site.reload(fallback()).unwrap();

    let summaries = site.summaries();
    assert_eq!(summaries.len(), 3);
    let welcome = summaries
        .iter()
        .find(|summary| summary.slug == "welcome")
        .unwrap();
    assert_eq!(
        welcome.preview.preview_image.as_deref(),
        Some("img/welcome.png")
    );
    assert_eq!(welcome.preview.preview_text.as_deref(), Some("Hi there"));
}

#[test]
fn theme_preference_round_trips_through_sqlite_store() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let site = Site::new(
        MemoryPostSource::default(),
        store,
        Arc::new(MemoryReporter::new()),
    );
    assert_eq!(site.theme(), ThemePreference::System);

    site.set_theme(ThemePreference::Dark).unwrap();
    assert_eq!(site.theme(), ThemePreference::Dark);
}

#[test]
fn fs_backed_site_opens_posts_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.json"),
        r#"[{"slug": "hello", "title": "Hello"}]"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("posts")).unwrap();
    std::fs::write(
        dir.path().join("posts/hello.json"),
        r#"{"slug": "hello", "title": "Ignored", "content": "Body"}"#,
    )
    .unwrap();

    let source = FsPostSource::new(dir.path());
    let fallback = source.index_modified_at().unwrap();
    let mut site = Site::new(
        source,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryReporter::new()),
    );
    site.reload(fallback).unwrap();

    let post = site.open_post("hello").unwrap();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.content.as_deref(), Some("Body"));
    assert_eq!(post.date, fallback);
    assert!(post.date_is_fallback);
}
