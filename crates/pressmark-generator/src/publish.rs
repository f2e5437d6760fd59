//! Publish orchestration.
//!
//! The [`Publisher`] owns the source and target roots, the template engine
//! and the state of the current run. A full publish walks the source tree in
//! lexical order and dispatches every file to the converter, the asset
//! copier, or nowhere; single files can then be republished in place.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use pressmark_core::{
    Config, RenderedDocument, SourceKind,
    content::{html_output_path, url_path},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{
    assets::{AssetCopier, AssetError},
    convert::{DocumentConverter, DocumentOutcome},
    indexer::{IndexError, Indexer, SITE_INDEX},
    template::{TemplateEngine, TemplateError},
};

/// Fatal publish errors. Per-document problems end up in the report instead.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The source root does not exist.
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    /// Wiping the target would delete the source.
    #[error("target {target} contains source {source_dir}")]
    TargetContainsSource { source_dir: PathBuf, target: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Walking the source tree failed.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// Loading templates failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Generating the index page failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Copying an asset failed.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// A document that could not be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Source path relative to the source root.
    pub path: PathBuf,

    /// Human-readable cause.
    pub reason: String,
}

/// Summary of a full publish.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// Markdown documents found.
    pub documents: usize,

    /// Pages written, listing pages included.
    pub converted: usize,

    /// Assets copied.
    pub assets: usize,

    /// Files skipped.
    pub ignored: usize,

    /// Stale files removed from the target.
    pub pruned: usize,

    /// Documents that failed.
    pub failures: Vec<DocumentFailure>,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl PublishReport {
    /// Number of failed documents.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// What publishing a single file did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// A page was written.
    Converted,
    /// A listing page was registered; it is written after its entries.
    Listing,
    /// An asset was copied.
    Asset,
    /// The file is not published.
    Ignored,
    /// The document failed; see the run's failures.
    Failed,
    /// The source is gone and its output was removed.
    Removed,
}

/// State of one publish run: the index plus per-document bookkeeping.
#[derive(Debug)]
pub struct PublishRun {
    indexer: Indexer,
    listings: Vec<RenderedDocument>,
    failures: Vec<DocumentFailure>,
}

impl PublishRun {
    fn new(config: &Config) -> Self {
        Self {
            indexer: Indexer::new(config.index.noindex_category.clone()),
            listings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Entries indexed so far.
    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    /// Documents that failed in this run.
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    fn record_failure(&mut self, path: &Path, reason: impl ToString) {
        let reason = reason.to_string();
        error!(path = %path.display(), error = %reason, "failed to publish document");
        self.failures.push(DocumentFailure {
            path: path.to_path_buf(),
            reason,
        });
    }

    fn forget(&mut self, relative: &Path) {
        let source = url_path(relative);
        self.indexer.remove(&source);
        self.listings.retain(|doc| doc.source != source);
        self.failures.retain(|f| f.path != relative);
    }
}

/// Everything needed to publish a file, apart from the run state.
#[derive(Debug)]
struct Pipeline {
    source_root: PathBuf,
    target_root: PathBuf,
    template_dir: PathBuf,
    base_url: String,
    config: Config,
    engine: TemplateEngine,
    converter: DocumentConverter,
    assets: AssetCopier,
}

impl Pipeline {
    fn dispatch(&self, run: &mut PublishRun, relative: &Path) -> Result<FileOutcome> {
        match SourceKind::classify(relative, &self.config.assets.extensions) {
            SourceKind::Markdown => {
                match self
                    .converter
                    .convert(relative, &self.engine, Some(&mut run.indexer))
                {
                    Ok(DocumentOutcome::Converted(_)) => Ok(FileOutcome::Converted),
                    Ok(DocumentOutcome::Listing(doc)) => {
                        run.listings.push(doc);
                        Ok(FileOutcome::Listing)
                    }
                    Err(e) => {
                        run.record_failure(relative, e);
                        Ok(FileOutcome::Failed)
                    }
                }
            }
            SourceKind::Asset if relative == Path::new(SITE_INDEX) => {
                warn!(path = %relative.display(), "asset would overwrite the site index, skipping");
                Ok(FileOutcome::Ignored)
            }
            SourceKind::Asset => {
                self.assets
                    .copy(&self.source_root, &self.target_root, relative)?;
                Ok(FileOutcome::Asset)
            }
            SourceKind::Ignored => {
                debug!(path = %relative.display(), "ignoring file");
                Ok(FileOutcome::Ignored)
            }
        }
    }

    /// Write every registered listing page; returns how many were written.
    fn render_listings(&self, run: &mut PublishRun) -> usize {
        let mut written = 0;
        let mut failed = Vec::new();

        for doc in &run.listings {
            let dir = Path::new(&doc.source)
                .parent()
                .map(url_path)
                .unwrap_or_default();
            let entries = run.indexer.listing_for(&dir, &doc.source);

            match self.converter.write_listing(&self.engine, doc, &entries) {
                Ok(path) => {
                    debug!(path = %path.display(), entries = entries.len(), "wrote listing");
                    written += 1;
                }
                Err(e) => failed.push((doc.source.clone(), e)),
            }
        }

        for (source, e) in failed {
            run.indexer.remove(&source);
            run.listings.retain(|doc| doc.source != source);
            run.record_failure(Path::new(&source), e);
        }

        written
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        let hidden = relative.components().any(|c| match c {
            Component::Normal(part) => part.to_string_lossy().starts_with('.'),
            _ => false,
        });
        let absolute = self.source_root.join(relative);
        hidden || absolute.starts_with(&self.template_dir) || absolute.starts_with(&self.target_root)
    }
}

/// Drives publishing from a source tree into a target tree.
#[derive(Debug)]
pub struct Publisher {
    pipeline: Pipeline,
    run: PublishRun,
}

impl Publisher {
    /// Prepare a publisher: the target is wiped and recreated, and templates
    /// are loaded from the source's template directory.
    pub fn initialize(
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
        base_url: impl Into<String>,
        config: Config,
    ) -> Result<Self> {
        let source = source.as_ref();
        let target = target.as_ref();

        if !source.is_dir() {
            return Err(PublishError::MissingSource(source.to_path_buf()));
        }
        let source_root = source.canonicalize()?;

        if target.exists() {
            let existing = target.canonicalize()?;
            if source_root.starts_with(&existing) {
                return Err(PublishError::TargetContainsSource {
                    source_dir: source_root,
                    target: existing,
                });
            }
            debug!(dir = %existing.display(), "cleaning target directory");
            fs::remove_dir_all(&existing)?;
        }
        fs::create_dir_all(target)?;
        let target_root = target.canonicalize()?;

        let template_dir = source_root.join(&config.templates.dir);
        let engine = TemplateEngine::load(&template_dir)?;
        for required in [&config.templates.default, &config.templates.index] {
            if !engine.has_template(required) {
                warn!(template = %required, dir = %template_dir.display(), "template not found");
            }
        }

        let base_url = base_url.into();
        info!(
            source = %source_root.display(),
            target = %target_root.display(),
            base_url = %base_url,
            "publisher initialized"
        );

        let converter = DocumentConverter::new(
            &source_root,
            &target_root,
            base_url.clone(),
            config.clone(),
        );
        let assets = AssetCopier::new(config.assets.extensions.clone());
        let run = PublishRun::new(&config);

        Ok(Self {
            pipeline: Pipeline {
                source_root,
                target_root,
                template_dir,
                base_url,
                config,
                engine,
                converter,
                assets,
            },
            run,
        })
    }

    /// Publish the whole source tree and regenerate the index.
    pub fn publish_all(&mut self) -> Result<PublishReport> {
        let start = Instant::now();
        let mut report = PublishReport::default();
        let pipeline = &self.pipeline;
        let mut run = PublishRun::new(&pipeline.config);

        let mut produced = BTreeSet::from([PathBuf::from(SITE_INDEX)]);

        info!(source = %pipeline.source_root.display(), "publishing site");

        let walker = WalkDir::new(&pipeline.source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_name().to_string_lossy().starts_with('.')
                        || entry.path() == pipeline.template_dir
                        || entry.path() == pipeline.target_root)
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&pipeline.source_root)
                .unwrap_or_else(|_| entry.path());

            match pipeline.dispatch(&mut run, relative)? {
                FileOutcome::Converted => {
                    report.documents += 1;
                    report.converted += 1;
                    produced.insert(html_output_path(relative));
                }
                FileOutcome::Listing | FileOutcome::Failed => report.documents += 1,
                FileOutcome::Asset => {
                    report.assets += 1;
                    produced.insert(relative.to_path_buf());
                }
                FileOutcome::Ignored => report.ignored += 1,
                FileOutcome::Removed => {}
            }
        }

        report.converted += pipeline.render_listings(&mut run);
        produced.extend(
            run.listings
                .iter()
                .map(|doc| html_output_path(Path::new(&doc.source))),
        );
        run.indexer.generate(
            &pipeline.engine,
            &pipeline.target_root,
            &pipeline.base_url,
            &pipeline.config,
        )?;
        report.pruned = prune_target(&pipeline.target_root, &produced)?;

        report.failures = run.failures.clone();
        report.duration_ms = start.elapsed().as_millis() as u64;
        self.run = run;

        if report.failed() > 0 {
            warn!(
                failed = report.failed(),
                total = report.documents,
                "{} of {} documents failed",
                report.failed(),
                report.documents
            );
        }
        info!(
            documents = report.documents,
            converted = report.converted,
            assets = report.assets,
            ignored = report.ignored,
            pruned = report.pruned,
            duration_ms = report.duration_ms,
            "publish complete"
        );

        Ok(report)
    }

    /// Republish one file, given relative to the source root.
    ///
    /// The file's previous index entry is replaced, listing pages are
    /// re-rendered, and `index.html` is left alone. A file that no longer
    /// exists or fails to convert has its output removed.
    pub fn publish_one(&mut self, relative: &Path) -> Result<FileOutcome> {
        let pipeline = &self.pipeline;
        if pipeline.is_excluded(relative) {
            debug!(path = %relative.display(), "skipping excluded path");
            return Ok(FileOutcome::Ignored);
        }

        self.run.forget(relative);

        let source = pipeline.source_root.join(relative);
        let outcome = if source.is_file() {
            info!(path = %relative.display(), "republishing file");
            let outcome = pipeline.dispatch(&mut self.run, relative)?;
            if outcome == FileOutcome::Failed {
                remove_stale_output(pipeline, relative)?;
            }
            outcome
        } else if source.exists() {
            return Ok(FileOutcome::Ignored);
        } else {
            debug!(path = %relative.display(), "source no longer exists");
            remove_stale_output(pipeline, relative)?
        };

        pipeline.render_listings(&mut self.run);
        Ok(outcome)
    }

    /// Re-read the template directory.
    pub fn reload_templates(&mut self) -> Result<()> {
        self.pipeline.engine.reload()?;
        info!(dir = %self.pipeline.template_dir.display(), "templates reloaded");
        Ok(())
    }

    /// Translate a path reported by the file system into one relative to
    /// the source root. Removed files are resolved through their parent.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let source_root = &self.pipeline.source_root;
        if let Ok(relative) = path.strip_prefix(source_root) {
            return Some(relative.to_path_buf());
        }

        let parent = path.parent()?.canonicalize().ok()?;
        let relative = parent.strip_prefix(source_root).ok()?;
        Some(relative.join(path.file_name()?))
    }

    /// Whether `path` lies in the template directory.
    pub fn is_template_path(&self, path: &Path) -> bool {
        self.relative_path(path).is_some_and(|relative| {
            self.pipeline
                .source_root
                .join(relative)
                .starts_with(&self.pipeline.template_dir)
        })
    }

    /// Whether `path` lies in the target directory.
    pub fn is_target_path(&self, path: &Path) -> bool {
        path.starts_with(&self.pipeline.target_root)
    }

    /// Canonical source root.
    pub fn source_root(&self) -> &Path {
        &self.pipeline.source_root
    }

    /// Canonical target root.
    pub fn target_root(&self) -> &Path {
        &self.pipeline.target_root
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.pipeline.base_url
    }

    /// Site configuration.
    pub fn config(&self) -> &Config {
        &self.pipeline.config
    }

    /// State of the latest run.
    pub fn run(&self) -> &PublishRun {
        &self.run
    }
}

/// Delete every file under `target_root` that is not in `produced`, then
/// any directory left empty. Returns the number of files removed.
fn prune_target(target_root: &Path, produced: &BTreeSet<PathBuf>) -> Result<usize> {
    let mut removed = 0;
    for entry in WalkDir::new(target_root).min_depth(1).contents_first(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(target_root)
            .unwrap_or_else(|_| entry.path());

        if entry.file_type().is_dir() {
            if fs::read_dir(entry.path())?.next().is_none() {
                fs::remove_dir(entry.path())?;
            }
        } else if !produced.contains(relative) {
            fs::remove_file(entry.path())?;
            debug!(path = %relative.display(), "pruned stale output");
            removed += 1;
        }
    }
    Ok(removed)
}

fn remove_stale_output(pipeline: &Pipeline, relative: &Path) -> Result<FileOutcome> {
    let output = match SourceKind::classify(relative, &pipeline.config.assets.extensions) {
        SourceKind::Markdown => html_output_path(relative),
        SourceKind::Asset => relative.to_path_buf(),
        SourceKind::Ignored => return Ok(FileOutcome::Ignored),
    };
    if output == Path::new(SITE_INDEX) {
        return Ok(FileOutcome::Ignored);
    }

    let output = pipeline.target_root.join(output);
    match fs::remove_file(&output) {
        Ok(()) => {
            info!(path = %output.display(), "removed stale output");
            Ok(FileOutcome::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileOutcome::Removed),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn site() -> (TempDir, TempDir) {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let templates = source.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("article.jinja"), "<h1>{{ title }}</h1>{{ body }}").unwrap();
        fs::write(
            templates.join("index.jinja"),
            "{% for d in docs %}<li>{{ d.title }}|{{ d.category }}</li>{% endfor %}",
        )
        .unwrap();
        (source, target)
    }

    #[test]
    fn test_missing_source() {
        let target = TempDir::new().unwrap();
        let result = Publisher::initialize(
            "/nonexistent/source",
            target.path(),
            "",
            Config::default(),
        );
        assert!(matches!(result, Err(PublishError::MissingSource(_))));
    }

    #[test]
    fn test_missing_template_dir_is_fatal() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let result = Publisher::initialize(source.path(), target.path(), "", Config::default());
        assert!(matches!(
            result,
            Err(PublishError::Template(TemplateError::MissingDir(_)))
        ));
    }

    #[test]
    fn test_initialize_wipes_target() {
        let (source, target) = site();
        fs::write(target.path().join("stale.html"), "old").unwrap();

        Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();

        assert!(target.path().is_dir());
        assert!(!target.path().join("stale.html").exists());
    }

    #[test]
    fn test_refuses_target_containing_source() {
        let outer = TempDir::new().unwrap();
        let source = outer.path().join("site");
        fs::create_dir_all(source.join("templates")).unwrap();

        let result = Publisher::initialize(&source, outer.path(), "", Config::default());
        assert!(matches!(
            result,
            Err(PublishError::TargetContainsSource { .. })
        ));
        assert!(source.exists());
    }

    #[test]
    fn test_publish_all_counts() {
        let (source, target) = site();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();
        fs::write(source.path().join("broken.md"), "category: X\n\nNo title").unwrap();
        fs::write(source.path().join("style.css"), "body {}").unwrap();
        fs::write(source.path().join("notes.txt"), "skip").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        let report = publisher.publish_all().unwrap();

        assert_eq!(report.documents, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.assets, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("broken.md"));
        assert_eq!(publisher.run().indexer().len(), 1);
    }

    #[test]
    fn test_templates_not_published() {
        let (source, target) = site();
        fs::write(source.path().join("templates/extra.css"), "x").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();

        assert!(!target.path().join("templates").exists());
    }

    #[test]
    fn test_publish_one_updates_entry() {
        let (source, target) = site();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();

        fs::write(source.path().join("a.md"), "title: A2\ncategory: Y\n\nA").unwrap();
        let outcome = publisher.publish_one(Path::new("a.md")).unwrap();

        assert_eq!(outcome, FileOutcome::Converted);
        let entries = publisher.run().indexer().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "A2");
        let html = fs::read_to_string(target.path().join("a.html")).unwrap();
        assert!(html.contains("<h1>A2</h1>"));
    }

    #[test]
    fn test_publish_one_removed_source() {
        let (source, target) = site();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();
        assert!(target.path().join("a.html").exists());

        fs::remove_file(source.path().join("a.md")).unwrap();
        let outcome = publisher.publish_one(Path::new("a.md")).unwrap();

        assert_eq!(outcome, FileOutcome::Removed);
        assert!(!target.path().join("a.html").exists());
        assert!(publisher.run().indexer().is_empty());
    }

    #[test]
    fn test_publish_one_fixes_failure() {
        let (source, target) = site();
        fs::write(source.path().join("a.md"), "category: X\n\nA").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();
        assert_eq!(publisher.run().failures().len(), 1);

        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();
        publisher.publish_one(Path::new("a.md")).unwrap();

        assert!(publisher.run().failures().is_empty());
        assert!(target.path().join("a.html").exists());
    }

    #[test]
    fn test_root_index_document_never_replaces_site_index() {
        let (source, target) = site();
        fs::write(source.path().join("index.md"), "title: Home\ncategory: X\n\nHome").unwrap();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        let report = publisher.publish_all().unwrap();

        let index = "<li>A|X</li>";
        assert_eq!(report.converted, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("index.md"));
        assert_eq!(fs::read_to_string(target.path().join("index.html")).unwrap(), index);

        fs::write(source.path().join("index.md"), "title: Home2\ncategory: X\n\nHome").unwrap();
        assert_eq!(
            publisher.publish_one(Path::new("index.md")).unwrap(),
            FileOutcome::Failed
        );
        assert_eq!(fs::read_to_string(target.path().join("index.html")).unwrap(), index);

        fs::write(
            source.path().join("index.md"),
            "title: Home\ncategory: X\nindex:\n\nHome",
        )
        .unwrap();
        publisher.publish_one(Path::new("index.md")).unwrap();
        publisher.publish_one(Path::new("a.md")).unwrap();
        assert_eq!(fs::read_to_string(target.path().join("index.html")).unwrap(), index);

        fs::remove_file(source.path().join("index.md")).unwrap();
        publisher.publish_one(Path::new("index.md")).unwrap();
        assert!(target.path().join("index.html").exists());
    }

    #[test]
    fn test_publish_all_prunes_removed_sources() {
        let (source, target) = site();
        fs::create_dir_all(source.path().join("old")).unwrap();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();
        fs::write(source.path().join("b.md"), "title: B\ncategory: X\n\nB").unwrap();
        fs::write(source.path().join("old/c.md"), "title: C\ncategory: X\n\nC").unwrap();
        fs::write(source.path().join("old/c.css"), "p {}").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();
        assert!(target.path().join("old/c.html").exists());

        fs::remove_file(source.path().join("b.md")).unwrap();
        fs::remove_dir_all(source.path().join("old")).unwrap();
        let report = publisher.publish_all().unwrap();

        assert_eq!(report.pruned, 3);
        assert!(target.path().join("a.html").exists());
        assert!(target.path().join("index.html").exists());
        assert!(!target.path().join("b.html").exists());
        assert!(!target.path().join("old").exists());
        assert_eq!(
            fs::read_to_string(target.path().join("index.html")).unwrap(),
            "<li>A|X</li>"
        );
    }

    #[test]
    fn test_publish_one_failure_removes_old_page() {
        let (source, target) = site();
        fs::write(source.path().join("a.md"), "title: A\ncategory: X\n\nA").unwrap();

        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();
        publisher.publish_all().unwrap();

        fs::write(source.path().join("a.md"), "category: X\n\nA").unwrap();
        let outcome = publisher.publish_one(Path::new("a.md")).unwrap();

        assert_eq!(outcome, FileOutcome::Failed);
        assert!(!target.path().join("a.html").exists());
    }

    #[test]
    fn test_path_helpers() {
        let (source, target) = site();
        let mut publisher =
            Publisher::initialize(source.path(), target.path(), "", Config::default()).unwrap();

        let root = publisher.source_root().to_path_buf();
        assert_eq!(
            publisher.relative_path(&root.join("posts/a.md")),
            Some(PathBuf::from("posts/a.md"))
        );
        assert!(publisher.is_template_path(&root.join("templates/article.jinja")));
        assert!(!publisher.is_template_path(&root.join("a.md")));
        assert_eq!(
            publisher.publish_one(Path::new(".git/HEAD")).unwrap(),
            FileOutcome::Ignored
        );
    }
}
