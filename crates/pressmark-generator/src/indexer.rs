//! Site index and directory listings.
//!
//! The indexer collects one entry per published document during a run and
//! renders the site index page from them. Listing pages ask it for the
//! entries under their own directory.

use std::{
    cmp::Reverse,
    fs, io,
    path::{Path, PathBuf},
};

use pressmark_core::{Config, IndexEntry, config::IndexOrder};
use thiserror::Error;
use tracing::{debug, info};

use crate::template::{TemplateContext, TemplateEngine, TemplateError};

/// Output path of the site index, relative to the target root. No document
/// or asset may be published there.
pub const SITE_INDEX: &str = "index.html";

/// Index generation errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Rendering the index template failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Writing `index.html` failed.
    #[error("failed to write index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Index entries for the current publish run.
#[derive(Debug, Clone)]
pub struct Indexer {
    entries: Vec<IndexEntry>,
    noindex_category: String,
}

impl Indexer {
    /// Create an empty indexer that ignores `noindex_category`.
    #[must_use]
    pub fn new(noindex_category: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            noindex_category: noindex_category.into(),
        }
    }

    /// Register an entry. An entry for the same source replaces the old one
    /// in place. Returns `false` if the category is not indexed.
    pub fn add(&mut self, entry: IndexEntry) -> bool {
        if entry.category == self.noindex_category {
            debug!(source = %entry.source, "not indexed");
            return false;
        }

        match self.entries.iter_mut().find(|e| e.source == entry.source) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        true
    }

    /// Drop the entry for `source`, if any.
    pub fn remove(&mut self, source: &str) -> Option<IndexEntry> {
        let pos = self.entries.iter().position(|e| e.source == source)?;
        Some(self.entries.remove(pos))
    }

    /// Entries in encounter order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the requested order.
    pub fn ordered(&self, order: IndexOrder) -> Vec<&IndexEntry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        if order == IndexOrder::Date {
            sort_newest_first(&mut entries);
        }
        entries
    }

    /// Entries whose source lies in `dir` or below, newest first.
    ///
    /// `dir` is a `/`-separated path relative to the source root; the empty
    /// string is the root. The entry for `exclude` is left out.
    pub fn listing_for(&self, dir: &str, exclude: &str) -> Vec<&IndexEntry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir.trim_end_matches('/'))
        };

        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.source != exclude && e.source.starts_with(&prefix))
            .collect();
        sort_newest_first(&mut entries);
        entries
    }

    /// Render the index template into `index.html` at the target root.
    pub fn generate(
        &self,
        engine: &TemplateEngine,
        target_root: &Path,
        base_url: &str,
        config: &Config,
    ) -> Result<PathBuf> {
        let docs = self.ordered(config.index.order);

        let mut ctx = TemplateContext::new();
        ctx.insert("docs", &docs);
        ctx.insert("base_url", base_url);
        ctx.insert("site_name", &config.site.name);

        let html = engine.render(&config.templates.index, &ctx)?;

        let path = target_root.join(SITE_INDEX);
        fs::write(&path, html).map_err(|source| IndexError::Io {
            path: path.clone(),
            source,
        })?;

        info!(entries = docs.len(), path = %path.display(), "generated index");
        Ok(path)
    }
}

/// Stable sort by parsed date, newest first; undated entries go last.
fn sort_newest_first(entries: &mut [&IndexEntry]) {
    entries.sort_by_key(|e| Reverse(e.parsed_date()));
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn entry(source: &str, category: &str, date: Option<&str>) -> IndexEntry {
        IndexEntry {
            title: source.to_string(),
            category: category.to_string(),
            summary: None,
            date: date.map(str::to_string),
            slug: source.replace(".md", ".html"),
            url: format!("/{}", source.replace(".md", ".html")),
            last_modified: "Sun, 05 Jan 2020".to_string(),
            use_math: false,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_add_skips_sentinel() {
        let mut indexer = Indexer::new("noindex");
        assert!(indexer.add(entry("a.md", "Test", None)));
        assert!(!indexer.add(entry("about.md", "noindex", None)));
        assert_eq!(indexer.len(), 1);
    }

    #[test]
    fn test_add_replaces_same_source() {
        let mut indexer = Indexer::new("noindex");
        indexer.add(entry("a.md", "Old", None));
        indexer.add(entry("b.md", "Test", None));
        indexer.add(entry("a.md", "New", None));

        let categories: Vec<_> = indexer.entries().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["New", "Test"]);
    }

    #[test]
    fn test_remove() {
        let mut indexer = Indexer::new("noindex");
        indexer.add(entry("a.md", "Test", None));
        assert!(indexer.remove("a.md").is_some());
        assert!(indexer.remove("a.md").is_none());
        assert!(indexer.is_empty());
    }

    #[test]
    fn test_date_order_undated_last() {
        let mut indexer = Indexer::new("noindex");
        indexer.add(entry("undated.md", "T", None));
        indexer.add(entry("old.md", "T", Some("2019-03-01")));
        indexer.add(entry("new.md", "T", Some("05 Jan 2020")));

        let encounter: Vec<_> = indexer
            .ordered(IndexOrder::Encounter)
            .iter()
            .map(|e| e.source.as_str())
            .collect();
        assert_eq!(encounter, vec!["undated.md", "old.md", "new.md"]);

        let by_date: Vec<_> = indexer
            .ordered(IndexOrder::Date)
            .iter()
            .map(|e| e.source.as_str())
            .collect();
        assert_eq!(by_date, vec!["new.md", "old.md", "undated.md"]);
    }

    #[test]
    fn test_listing_for_subtree() {
        let mut indexer = Indexer::new("noindex");
        indexer.add(entry("top.md", "T", Some("2021-01-01")));
        indexer.add(entry("posts/index.md", "T", None));
        indexer.add(entry("posts/a.md", "T", Some("2020-01-01")));
        indexer.add(entry("posts/2020/b.md", "T", Some("2020-06-01")));
        indexer.add(entry("postscript.md", "T", None));

        let listed: Vec<_> = indexer
            .listing_for("posts", "posts/index.md")
            .iter()
            .map(|e| e.source.as_str())
            .collect();
        assert_eq!(listed, vec!["posts/2020/b.md", "posts/a.md"]);

        assert_eq!(indexer.listing_for("", "index.md").len(), 5);
    }

    #[test]
    fn test_generate_writes_index() {
        let target = TempDir::new().unwrap();
        let engine = TemplateEngine::from_sources([(
            "index.jinja",
            "{{ site_name }}:{% for d in docs %}<li>{{ d.title }} ({{ d.category }}) {{ d.url }}</li>{% endfor %}",
        )])
        .unwrap();

        let mut indexer = Indexer::new("noindex");
        indexer.add(entry("post.md", "Test", None));
        indexer
            .generate(&engine, target.path(), "", &Config::default())
            .unwrap();

        let html = fs::read_to_string(target.path().join("index.html")).unwrap();
        assert_eq!(html, "pressmark:<li>post.md (Test) /post.html</li>");
    }

    #[test]
    fn test_generate_missing_template() {
        let target = TempDir::new().unwrap();
        let engine = TemplateEngine::from_sources([("article.jinja", "")]).unwrap();

        let result = Indexer::new("noindex").generate(&engine, target.path(), "", &Config::default());
        assert!(matches!(
            result,
            Err(IndexError::Template(TemplateError::NotFound(_)))
        ));
    }
}
