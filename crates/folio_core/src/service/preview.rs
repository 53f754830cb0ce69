//! Markdown-derived post summaries.
//!
//! # Responsibility
//! - Derive plain-text previews and cover images from post bodies.
//!
//! # Invariants
//! - `preview_text` is whitespace-normalized and at most 100 chars.
//! - `preview_image` is the first markdown image target, if any.

use crate::model::post::{PostRecord, Slug};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_TEXT_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid html tag regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Preview fields derived from a post body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownPreview {
    pub preview_text: Option<String>,
    pub preview_image: Option<String>,
}

/// Listing row for menus and site maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub slug: Slug,
    pub title: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub preview: MarkdownPreview,
}

/// Builds a listing row; posts without a loaded body get an empty preview.
pub fn summarize_post(post: &PostRecord) -> PostSummary {
    PostSummary {
        slug: post.slug.clone(),
        title: post.title.clone(),
        date: post.date,
        category: post.category.clone(),
        preview: post
            .content
            .as_deref()
            .map(derive_markdown_preview)
            .unwrap_or_default(),
    }
}

/// Derives preview fields from markdown (or inline HTML) content.
pub fn derive_markdown_preview(content: &str) -> MarkdownPreview {
    let preview_image = MARKDOWN_IMAGE_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|target| target.as_str().trim().to_string())
        .filter(|target| !target.is_empty());

    let text = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let text = MARKDOWN_LINK_RE.replace_all(&text, "$1");
    let text = HTML_TAG_RE.replace_all(&text, " ");
    let text = MARKDOWN_SYMBOL_RE.replace_all(&text, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let trimmed = text.trim();

    MarkdownPreview {
        preview_text: (!trimmed.is_empty())
            .then(|| trimmed.chars().take(PREVIEW_TEXT_MAX_CHARS).collect()),
        preview_image,
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_markdown_preview, summarize_post};
    use crate::model::post::{PostRecord, RawPostEntry};
    use chrono::Utc;

    #[test]
    fn preview_extracts_first_image_path() {
        let preview = derive_markdown_preview("x ![a](one.png) y ![b](two.png)");
        assert_eq!(preview.preview_image.as_deref(), Some("one.png"));
    }

    #[test]
    fn preview_strips_markdown_and_html() {
        let source = "# title\n\n<p>- [link](https://example.com)</p>\n**bold** `code`";
        let text = derive_markdown_preview(source)
            .preview_text
            .expect("preview_text should exist");
        assert_eq!(text, "title link bold code");
    }

    #[test]
    fn preview_is_capped_at_100_chars() {
        let text = derive_markdown_preview(&"word ".repeat(60))
            .preview_text
            .unwrap();
        assert_eq!(text.chars().count(), 100);
    }

    #[test]
    fn summary_without_content_has_no_preview() {
        let post = PostRecord::from_raw(&RawPostEntry::new("a", "A"), Utc::now()).unwrap();
        let summary = summarize_post(&post);
        assert_eq!(summary.preview.preview_text, None);
        assert_eq!(summary.title, "A");
    }
}
