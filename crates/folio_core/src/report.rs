//! Recoverable core events and the reporting collaborator.
//!
//! # Responsibility
//! - Name every recoverable condition core handles locally.
//! - Route those conditions to one caller-provided `Reporter`.
//!
//! # Invariants
//! - Reporting never fails and never changes core state.
//! - Events carry metadata only; post bodies are never included.

use crate::model::post::EntryRejection;
use log::warn;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Recoverable condition observed by core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// One raw entry failed required-field validation and was skipped.
    MalformedEntry {
        position: usize,
        reason: EntryRejection,
    },
    /// The post source errored; the previous catalog was kept.
    SourceUnavailable { message: String },
    /// A lookup or navigation call named a slug absent from the catalog.
    UnknownSlug {
        slug: String,
        operation: &'static str,
    },
    /// A "pick one post" query ran against an empty catalog.
    EmptyCatalog { operation: &'static str },
    /// A key-value read or write failed.
    PersistenceFailed { key: String, message: String },
    /// A stored preference value could not be interpreted.
    InvalidPreference { key: String, value: String },
}

impl CoreEvent {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedEntry { .. } => "malformed_entry",
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::UnknownSlug { .. } => "unknown_slug",
            Self::EmptyCatalog { .. } => "empty_catalog",
            Self::PersistenceFailed { .. } => "persistence_failed",
            Self::InvalidPreference { .. } => "invalid_preference",
        }
    }
}

impl Display for CoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedEntry { position, reason } => {
                write!(f, "skipped entry #{position}: {reason}")
            }
            Self::SourceUnavailable { message } => write!(f, "post source unavailable: {message}"),
            Self::UnknownSlug { slug, operation } => {
                write!(f, "{operation}: unknown slug `{slug}`")
            }
            Self::EmptyCatalog { operation } => write!(f, "{operation}: catalog is empty"),
            Self::PersistenceFailed { key, message } => {
                write!(f, "persistence failed for `{key}`: {message}")
            }
            Self::InvalidPreference { key, value } => {
                write!(f, "invalid stored value for `{key}`: `{value}`")
            }
        }
    }
}

/// Sink for recoverable core events.
///
/// The presentation layer implements this to turn events into visible
/// messages; core never produces UI text itself.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &CoreEvent);
}

/// Reporter that writes each event as a structured `warn` log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: &CoreEvent) {
        warn!(
            "event=core_report module=report status=recovered code={} detail={}",
            event.code(),
            event
        );
    }
}

/// Reporter that keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<CoreEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<CoreEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns recorded event codes, in arrival order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.events().iter().map(CoreEvent::code).collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &CoreEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreEvent, MemoryReporter, Reporter};
    use crate::model::post::EntryRejection;

    #[test]
    fn memory_reporter_keeps_arrival_order() {
        let reporter = MemoryReporter::new();
        reporter.report(&CoreEvent::EmptyCatalog {
            operation: "most_recent",
        });
        reporter.report(&CoreEvent::MalformedEntry {
            position: 3,
            reason: EntryRejection::MissingSlug,
        });
        assert_eq!(reporter.codes(), vec!["empty_catalog", "malformed_entry"]);
    }

    #[test]
    fn display_names_the_operation_and_slug() {
        let event = CoreEvent::UnknownSlug {
            slug: "missing".to_string(),
            operation: "set_current",
        };
        assert_eq!(event.to_string(), "set_current: unknown slug `missing`");
    }
}
