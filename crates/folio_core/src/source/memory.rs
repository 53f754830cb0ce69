use super::{PostSource, SourceError, SourceResult};
use crate::model::post::RawPostEntry;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<RawPostEntry>,
    outage: Option<String>,
}

/// In-memory post source.
///
/// Entries can be replaced and outages simulated through `&self`, so the
/// source can stay owned by a `Site` while tests drive it.
#[derive(Debug, Default)]
pub struct MemoryPostSource {
    state: Mutex<MemoryState>,
}

impl MemoryPostSource {
    pub fn new(entries: Vec<RawPostEntry>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                entries,
                outage: None,
            }),
        }
    }

    /// Replaces the served entries.
    pub fn replace_entries(&self, entries: Vec<RawPostEntry>) {
        self.state_mut().entries = entries;
    }

    /// Makes every fetch fail with `message` until cleared with `None`.
    pub fn set_outage(&self, message: Option<&str>) {
        self.state_mut().outage = message.map(str::to_string);
    }

    fn state_mut(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn with_state<T>(&self, read: impl FnOnce(&MemoryState) -> SourceResult<T>) -> SourceResult<T> {
        let state = self.state_mut();
        if let Some(message) = state.outage.as_ref() {
            return Err(SourceError::Unavailable(message.clone()));
        }
        read(&*state)
    }
}

impl PostSource for MemoryPostSource {
    fn fetch_index(&self) -> SourceResult<Vec<RawPostEntry>> {
        self.with_state(|state| Ok(state.entries.clone()))
    }

    fn fetch_post(&self, slug: &str) -> SourceResult<RawPostEntry> {
        let slug = slug.trim();
        self.with_state(|state| {
            state
                .entries
                .iter()
                .rev()
                .find(|entry| entry.slug.as_deref().map(str::trim) == Some(slug))
                .cloned()
                .ok_or_else(|| SourceError::NotFound(slug.to_string()))
        })
    }
}
