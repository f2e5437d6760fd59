//! Content types and structures.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::frontmatter::parse_date;

/// How a file found under the source root is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Markdown document, converted to HTML.
    Markdown,
    /// Static asset, copied verbatim.
    Asset,
    /// Dot-file or unrecognised extension, skipped.
    Ignored,
}

impl SourceKind {
    /// Classify a path by its basename and extension.
    ///
    /// Dot-prefixed basenames are ignored before the extension is looked at,
    /// so `.hidden.md` is never converted.
    pub fn classify(path: &Path, asset_extensions: &[String]) -> Self {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Self::Ignored;
        };

        if name.starts_with('.') {
            return Self::Ignored;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Ignored;
        };
        let ext = ext.to_lowercase();

        if ext == "md" {
            Self::Markdown
        } else if asset_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        {
            Self::Asset
        } else {
            Self::Ignored
        }
    }
}

/// Join the normal components of a relative path with `/`.
pub fn url_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Output path of a document: same relative path with an `.html` extension.
pub fn html_output_path(relative: &Path) -> PathBuf {
    relative.with_extension("html")
}

/// Public slug of an output path; a trailing `index.html` collapses so that
/// directory index pages resolve to their parent path.
///
/// - `posts/2020/index.html` → `posts/2020/`
/// - `posts/article.html` → `posts/article.html`
/// - `index.html` → ``
pub fn slug_for(relative_output: &Path) -> String {
    let path = url_path(relative_output);
    match path.strip_suffix("index.html") {
        Some(prefix) if prefix.is_empty() || prefix.ends_with('/') => prefix.to_string(),
        _ => path,
    }
}

/// A converted document: metadata after defaulting plus computed fields.
///
/// This is the template context of a page and the source of its index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Page title.
    pub title: String,

    /// Index category.
    pub category: String,

    /// Listing summary.
    #[serde(default)]
    pub summary: Option<String>,

    /// Publication date as written in the front matter.
    #[serde(default)]
    pub date: Option<String>,

    /// Template the page was rendered with.
    pub template: String,

    /// Output path relative to the target root, index suffix collapsed.
    pub slug: String,

    /// Base URL joined with the slug.
    pub url: String,

    /// Source modification time, e.g. `Sun, 05 Jan 2020`.
    pub last_modified: String,

    /// Whether the body contains a `$` math/currency delimiter.
    pub use_math: bool,

    /// Whether the document is a directory listing page.
    #[serde(default)]
    pub listing: bool,

    /// Source path relative to the source root, `/`-separated.
    pub source: String,

    /// Rendered HTML body.
    pub body: String,
}

impl RenderedDocument {
    /// The `date` field parsed for ordering.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Whether rendered HTML should load math rendering.
pub fn uses_math(body: &str) -> bool {
    body.contains('$')
}

/// Join a base URL and a slug.
pub fn page_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// A document's entry on index and listing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Page title.
    pub title: String,

    /// Index category.
    pub category: String,

    /// Listing summary.
    #[serde(default)]
    pub summary: Option<String>,

    /// Publication date as written in the front matter.
    #[serde(default)]
    pub date: Option<String>,

    /// Public slug.
    pub slug: String,

    /// Base URL joined with the slug.
    pub url: String,

    /// Source modification time.
    pub last_modified: String,

    /// Whether the page uses math rendering.
    pub use_math: bool,

    /// Source path relative to the source root.
    pub source: String,
}

impl IndexEntry {
    /// The `date` field parsed for ordering.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date)
    }
}

impl From<&RenderedDocument> for IndexEntry {
    fn from(doc: &RenderedDocument) -> Self {
        Self {
            title: doc.title.clone(),
            category: doc.category.clone(),
            summary: doc.summary.clone(),
            date: doc.date.clone(),
            slug: doc.slug.clone(),
            url: doc.url.clone(),
            last_modified: doc.last_modified.clone(),
            use_math: doc.use_math,
            source: doc.source.clone(),
        }
    }
}
