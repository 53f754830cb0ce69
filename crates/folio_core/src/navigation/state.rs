use crate::catalog::Catalog;
use crate::model::post::{PostRecord, Slug};
use crate::report::{CoreEvent, Reporter};
use crate::store::{KeyValueStore, LAST_VIEWED_KEY};
use log::{debug, info};
use std::sync::Arc;

/// Two-state navigation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// No current post (initial state).
    Unset,
    /// `current_slug` names a post in the bound catalog.
    Bound,
}

/// Catalog neighbors of the current post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent<'a> {
    /// Entry before the current one in catalog order (newer).
    pub previous: Option<&'a PostRecord>,
    /// Entry after the current one in catalog order (older).
    pub next: Option<&'a PostRecord>,
}

impl Adjacent<'_> {
    fn none() -> Self {
        Self {
            previous: None,
            next: None,
        }
    }
}

/// Current-post pointer bound to one catalog.
pub struct NavigationState {
    catalog: Arc<Catalog>,
    current_slug: Option<Slug>,
    store: Arc<dyn KeyValueStore>,
    reporter: Arc<dyn Reporter>,
}

impl NavigationState {
    /// Creates an unset navigation state over `catalog`.
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            catalog,
            current_slug: None,
            store,
            reporter,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn phase(&self) -> NavigationPhase {
        if self.current_slug.is_some() {
            NavigationPhase::Bound
        } else {
            NavigationPhase::Unset
        }
    }

    /// Moves to `slug` and persists it as the last viewed post.
    ///
    /// Unknown slugs are reported and leave the state unchanged. A failed
    /// persistence write is reported; the in-session pointer still moves.
    pub fn set_current(&mut self, slug: &str) {
        let Some(position) = self.catalog.position_of(slug) else {
            self.reporter.report(&CoreEvent::UnknownSlug {
                slug: slug.to_string(),
                operation: "set_current",
            });
            return;
        };

        let slug = self.catalog.all()[position].slug.clone();
        if let Err(err) = self.store.set(LAST_VIEWED_KEY, &slug) {
            self.reporter.report(&CoreEvent::PersistenceFailed {
                key: LAST_VIEWED_KEY.to_string(),
                message: err.to_string(),
            });
        }
        debug!("event=nav_set module=navigation status=ok position={position}");
        self.current_slug = Some(slug);
    }

    /// Restores a persisted pointer at startup.
    ///
    /// A missing or unknown slug returns the state to `Unset`. Nothing is
    /// written back to the store.
    pub fn restore(&mut self, persisted_slug: Option<&str>) {
        let restored = persisted_slug.and_then(|slug| {
            let position = self.catalog.position_of(slug);
            if position.is_none() {
                self.reporter.report(&CoreEvent::UnknownSlug {
                    slug: slug.to_string(),
                    operation: "restore",
                });
            }
            position.map(|idx| self.catalog.all()[idx].slug.clone())
        });
        info!(
            "event=nav_restore module=navigation status={}",
            if restored.is_some() { "ok" } else { "unset" }
        );
        self.current_slug = restored;
    }

    /// Reads the last viewed slug from the store and restores it.
    pub fn restore_from_store(&mut self) {
        let persisted = match self.store.get(LAST_VIEWED_KEY) {
            Ok(value) => value,
            Err(err) => {
                self.reporter.report(&CoreEvent::PersistenceFailed {
                    key: LAST_VIEWED_KEY.to_string(),
                    message: err.to_string(),
                });
                None
            }
        };
        self.restore(persisted.as_deref());
    }

    pub fn current_slug(&self) -> Option<&str> {
        self.current_slug.as_deref()
    }

    pub fn current(&self) -> Option<&PostRecord> {
        self.current_slug
            .as_deref()
            .and_then(|slug| self.catalog.by_slug(slug))
    }

    /// Neighbors of the current post; both `None` when unset.
    pub fn adjacent(&self) -> Adjacent<'_> {
        let Some(position) = self
            .current_slug
            .as_deref()
            .and_then(|slug| self.catalog.position_of(slug))
        else {
            return Adjacent::none();
        };

        let posts = self.catalog.all();
        Adjacent {
            previous: position.checked_sub(1).and_then(|idx| posts.get(idx)),
            next: posts.get(position + 1),
        }
    }

    /// Swaps in a rebuilt catalog.
    ///
    /// The current pointer survives only if its slug is still present.
    pub fn rebind(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
        let still_present = self
            .current_slug
            .as_deref()
            .is_some_and(|slug| self.catalog.position_of(slug).is_some());
        if !still_present && self.current_slug.take().is_some() {
            debug!("event=nav_rebind module=navigation status=unset reason=slug_removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationPhase, NavigationState};
    use crate::catalog::Catalog;
    use crate::model::post::RawPostEntry;
    use crate::report::MemoryReporter;
    use crate::store::{KeyValueStore, MemoryStore, LAST_VIEWED_KEY};
    use chrono::Utc;
    use std::sync::Arc;

    #[test]
    fn rebind_drops_pointer_to_removed_post() {
        let first = Catalog::load(
            vec![RawPostEntry::new("a", "A"), RawPostEntry::new("b", "B")],
            Utc::now(),
        );
        let store = Arc::new(MemoryStore::new());
        let mut nav = NavigationState::new(
            Arc::new(first),
            store.clone(),
            Arc::new(MemoryReporter::new()),
        );
        nav.set_current("b");
        assert_eq!(store.get(LAST_VIEWED_KEY).unwrap().as_deref(), Some("b"));

        nav.rebind(Arc::new(Catalog::load(
            vec![RawPostEntry::new("b", "B2")],
            Utc::now(),
        )));
        assert_eq!(nav.current().map(|post| post.title.as_str()), Some("B2"));

        nav.rebind(Arc::new(Catalog::load(
            vec![RawPostEntry::new("a", "A")],
            Utc::now(),
        )));
        assert_eq!(nav.phase(), NavigationPhase::Unset);
    }
}
