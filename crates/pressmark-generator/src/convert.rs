//! Document conversion.
//!
//! Turns one Markdown source into an HTML page: front matter extraction,
//! Markdown rendering, computed fields, template rendering, write.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use pressmark_core::{
    Config, IndexEntry, RenderedDocument,
    content::{html_output_path, page_url, slug_for, url_path, uses_math},
    frontmatter,
};
use pressmark_parser::MarkdownRenderer;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    indexer::{Indexer, SITE_INDEX},
    template::{TemplateContext, TemplateEngine, TemplateError},
};

/// Layout of `last_modified`, e.g. `Sun, 05 Jan 2020`.
pub const LAST_MODIFIED_FORMAT: &str = "%a, %d %b %Y";

/// Conversion errors. Each one affects a single document.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The front matter has no `title`.
    #[error("no title field in metadata of {0}")]
    MissingTitle(PathBuf),

    /// Reading the source or writing the page failed.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source is not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    Encoding(PathBuf),

    /// Template lookup or rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The page would overwrite the generated site index.
    #[error("{0} would overwrite the site index; rename it or move it into a directory")]
    ReservedOutput(PathBuf),
}

/// Result type for conversion.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// What happened to a converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The page was written.
    Converted(RenderedDocument),
    /// A listing page; written once all entries are known.
    Listing(RenderedDocument),
}

impl DocumentOutcome {
    /// The converted document.
    pub fn document(&self) -> &RenderedDocument {
        match self {
            Self::Converted(doc) | Self::Listing(doc) => doc,
        }
    }
}

/// Converts Markdown sources under one root into pages under another.
#[derive(Debug)]
pub struct DocumentConverter {
    source_root: PathBuf,
    target_root: PathBuf,
    base_url: String,
    config: Config,
    renderer: MarkdownRenderer,
}

impl DocumentConverter {
    /// Create a converter.
    #[must_use]
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        config: Config,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            base_url: base_url.into(),
            config,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Convert one document and register it with `indexer`.
    ///
    /// Listing pages (front matter `index`) are registered but not written;
    /// the caller renders them with [`Self::write_listing`].
    pub fn convert(
        &self,
        relative: &Path,
        engine: &TemplateEngine,
        indexer: Option<&mut Indexer>,
    ) -> Result<DocumentOutcome> {
        info!(path = %relative.display(), "converting document");

        let doc = self.prepare(relative)?;

        let outcome = if doc.listing {
            DocumentOutcome::Listing(doc)
        } else {
            self.write_page(engine, &doc, None)?;
            DocumentOutcome::Converted(doc)
        };

        if let Some(indexer) = indexer {
            indexer.add(IndexEntry::from(outcome.document()));
        }

        Ok(outcome)
    }

    /// Read and render a document without writing it.
    pub fn prepare(&self, relative: &Path) -> Result<RenderedDocument> {
        if html_output_path(relative) == Path::new(SITE_INDEX) {
            return Err(ConvertError::ReservedOutput(relative.to_path_buf()));
        }

        let source_path = self.source_root.join(relative);
        let bytes = fs::read(&source_path).map_err(|source| ConvertError::Io {
            path: source_path.clone(),
            source,
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| ConvertError::Encoding(relative.to_path_buf()))?;

        let extracted =
            frontmatter::extract(&text, relative, &self.config.index.default_category);
        let metadata = extracted.metadata;
        let Some(title) = metadata.title else {
            return Err(ConvertError::MissingTitle(relative.to_path_buf()));
        };

        let modified = fs::metadata(&source_path)
            .and_then(|m| m.modified())
            .map_err(|source| ConvertError::Io {
                path: source_path.clone(),
                source,
            })?;

        let body = self.renderer.render(extracted.body);
        let slug = slug_for(&html_output_path(relative));

        Ok(RenderedDocument {
            title,
            category: metadata
                .category
                .unwrap_or_else(|| self.config.index.default_category.clone()),
            summary: metadata.summary,
            date: metadata.date,
            template: metadata
                .template
                .unwrap_or_else(|| self.config.templates.default.clone()),
            url: page_url(&self.base_url, &slug),
            slug,
            last_modified: format_last_modified(modified),
            use_math: uses_math(&body),
            listing: metadata.index,
            source: url_path(relative),
            body,
        })
    }

    /// Render and write a listing page with the entries it lists.
    pub fn write_listing(
        &self,
        engine: &TemplateEngine,
        doc: &RenderedDocument,
        entries: &[&IndexEntry],
    ) -> Result<PathBuf> {
        self.write_page(engine, doc, Some(entries))
    }

    fn write_page(
        &self,
        engine: &TemplateEngine,
        doc: &RenderedDocument,
        entries: Option<&[&IndexEntry]>,
    ) -> Result<PathBuf> {
        let mut ctx = self.page_context(doc);
        if let Some(entries) = entries {
            ctx.insert("docs", entries);
        }

        let html = engine.render(&doc.template, &ctx)?;

        let target_path = self.target_root.join(html_output_path(Path::new(&doc.source)));
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target_path, html).map_err(|source| ConvertError::Io {
            path: target_path.clone(),
            source,
        })?;

        debug!(path = %target_path.display(), template = %doc.template, "wrote page");
        Ok(target_path)
    }

    fn page_context(&self, doc: &RenderedDocument) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.insert("body", &doc.body);
        ctx.insert("title", &doc.title);
        ctx.insert("category", &doc.category);
        ctx.insert("summary", &doc.summary);
        ctx.insert("date", &doc.date);
        ctx.insert("slug", &doc.slug);
        ctx.insert("url", &doc.url);
        ctx.insert("last_modified", &doc.last_modified);
        ctx.insert("use_math", &doc.use_math);
        ctx.insert("page", doc);
        ctx.insert("site_name", &self.config.site.name);
        ctx.insert("base_url", &self.base_url);
        ctx
    }
}

/// Format a modification time as a UTC day-month-year string.
pub fn format_last_modified(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(LAST_MODIFIED_FORMAT)
        .to_string()
}
