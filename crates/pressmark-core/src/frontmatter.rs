//! Front matter extraction for Markdown documents.
//!
//! Documents start with a block of `key: value` lines, optionally opened by
//! `---`. The block ends at the first blank line, a `---` / `...` line, or
//! the first line that is neither a key nor an indented continuation:
//!
//! ```text
//! title: Hello
//! category: Notes
//! summary: A first post that goes on
//!     across two lines
//!
//! Body starts here.
//! ```

use std::{path::Path, sync::LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ ]{0,3}([A-Za-z0-9_-]+):\s*(.*)$").expect("front matter key pattern")
});

/// Recognised document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Page title (required).
    pub title: Option<String>,

    /// Index category (required, defaulted when absent).
    pub category: Option<String>,

    /// Short description for listings.
    pub summary: Option<String>,

    /// Free-form publication date.
    pub date: Option<String>,

    /// Template name overriding the configured default.
    pub template: Option<String>,

    /// Presence-only flag marking a directory listing page.
    pub index: bool,
}

/// Non-fatal problems found while extracting metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetadataProblem {
    /// No `title` key; the document cannot be published.
    #[error("no title field in metadata")]
    MissingTitle,

    /// No `category` key; the default category was applied.
    #[error("no category field in metadata")]
    MissingCategory,
}

/// Result of splitting a document into metadata and body.
#[derive(Debug, Clone)]
pub struct Extracted<'a> {
    /// Best-effort metadata, category already defaulted.
    pub metadata: Metadata,

    /// Markdown body following the front matter.
    pub body: &'a str,

    /// Problems found, in the order they were detected.
    pub problems: Vec<MetadataProblem>,
}

impl Extracted<'_> {
    /// Whether the document lacks a title.
    pub fn missing_title(&self) -> bool {
        self.problems.contains(&MetadataProblem::MissingTitle)
    }
}

/// Split raw text into lower-cased `(key, value)` pairs and the remaining body.
///
/// When the text has no front matter the pair list is empty and the body is
/// the whole input.
pub fn split_front_matter(content: &str) -> (Vec<(String, String)>, &str) {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut offset = 0;
    let mut first = true;

    for raw_line in content.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if first && line.trim_end() == "---" {
            first = false;
            offset += raw_line.len();
            continue;
        }
        first = false;

        if line.trim().is_empty() {
            offset += raw_line.len();
            break;
        }

        if !pairs.is_empty() && matches!(line.trim_end(), "---" | "...") {
            offset += raw_line.len();
            break;
        }

        if let Some(caps) = KEY_LINE.captures(line) {
            pairs.push((caps[1].to_lowercase(), caps[2].trim().to_string()));
        } else if line.starts_with("    ")
            && let Some((_, value)) = pairs.last_mut()
        {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.trim());
        } else {
            break;
        }

        offset += raw_line.len();
    }

    if pairs.is_empty() {
        return (pairs, content);
    }

    (pairs, &content[offset..])
}

/// Extract metadata and body from a document.
///
/// Missing `title` is logged as an error and missing `category` as a warning;
/// both are also returned in [`Extracted::problems`]. A missing category is
/// replaced with `default_category`.
pub fn extract<'a>(content: &'a str, path: &Path, default_category: &str) -> Extracted<'a> {
    let (pairs, body) = split_front_matter(content);
    let mut metadata = Metadata::from_pairs(pairs);
    let mut problems = Vec::new();

    if metadata.title.is_none() {
        error!(path = %path.display(), "no title field in metadata");
        problems.push(MetadataProblem::MissingTitle);
    }

    if metadata.category.is_none() {
        warn!(path = %path.display(), "no category field in metadata");
        problems.push(MetadataProblem::MissingCategory);
        metadata.category = Some(default_category.to_string());
    }

    Extracted {
        metadata,
        body,
        problems,
    }
}

impl Metadata {
    /// Build metadata from raw pairs. The first occurrence of a key wins and
    /// empty values count as absent.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut meta = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut meta.title,
                "category" => &mut meta.category,
                "summary" => &mut meta.summary,
                "date" => &mut meta.date,
                "template" => &mut meta.template,
                "index" => {
                    meta.index = true;
                    continue;
                }
                _ => continue,
            };

            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }

        meta
    }

    /// The `date` field parsed with [`parse_date`].
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Parse a front matter date in one of the accepted layouts.
///
/// Accepts RFC 3339, `2020-01-05 10:30[:00]`, `2020-01-05`, `05 Jan 2020`
/// and `January 05, 2020`.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(dt);
        }
    }

    ["%Y-%m-%d", "%d %b %Y", "%B %d, %Y"]
        .into_iter()
        .find_map(|layout| NaiveDate::parse_from_str(value, layout).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
