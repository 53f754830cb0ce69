//! Post record and raw entry model.
//!
//! # Responsibility
//! - Decode raw post entries leniently from JSON.
//! - Normalize raw entries into `PostRecord` values with defaults applied.
//!
//! # Invariants
//! - `slug` and `title` are trimmed and non-empty; `title` defaults to `slug`.
//! - `category` is never empty and defaults to `general`.
//! - `date` is always set; `date_is_fallback` marks caller-supplied dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category assigned to entries without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// URL-safe unique identifier of a post.
pub type Slug = String;

/// Untrusted post entry as served by an index or post source.
///
/// Every field is optional. Non-string values for known fields decode as
/// absent so one malformed field never rejects the surrounding index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPostEntry {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO-8601 date or timestamp.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Opaque markdown/HTML body. Index entries usually omit it.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RawPostEntry {
    /// Convenience constructor for the two required fields.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the raw date string.
    pub fn dated(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the raw category string.
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the raw content body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Decodes one index element.
    ///
    /// Non-object values produce an empty entry, which the catalog later
    /// skips as malformed.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Reason a raw entry was rejected during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRejection {
    MissingSlug,
}

impl EntryRejection {
    /// Stable machine-readable code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingSlug => "missing_slug",
        }
    }
}

impl Display for EntryRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSlug => write!(f, "entry has no slug"),
        }
    }
}

impl Error for EntryRejection {}

/// Normalized post owned by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub slug: Slug,
    pub title: String,
    /// Ordering key, serialized as RFC 3339.
    pub date: DateTime<Utc>,
    /// `true` when the entry had no parsable date and the fallback was used.
    pub date_is_fallback: bool,
    pub category: String,
    /// `None` until the full post has been fetched.
    pub content: Option<String>,
}

impl PostRecord {
    /// Normalizes one raw entry, applying title, category and date defaults.
    ///
    /// A blank title defaults to the slug.
    ///
    /// # Errors
    /// - `MissingSlug` when the slug is absent or blank.
    pub fn from_raw(
        raw: &RawPostEntry,
        fallback_date: DateTime<Utc>,
    ) -> Result<Self, EntryRejection> {
        let slug = non_blank(raw.slug.as_deref()).ok_or(EntryRejection::MissingSlug)?;
        let title = non_blank(raw.title.as_deref()).unwrap_or_else(|| slug.clone());
        let category =
            non_blank(raw.category.as_deref()).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let parsed_date = raw.date.as_deref().and_then(parse_post_date);

        Ok(Self {
            slug,
            title,
            date: parsed_date.unwrap_or(fallback_date),
            date_is_fallback: parsed_date.is_none(),
            category,
            content: raw.content.clone(),
        })
    }

    /// Returns whether the full body has been loaded.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

/// Parses the date formats accepted in post entries.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and naive
/// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` (read as UTC).
pub fn parse_post_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}
