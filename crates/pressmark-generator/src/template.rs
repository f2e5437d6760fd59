//! Template engine.
//!
//! Templates are Jinja-style files loaded with tera from the site's template
//! directory. A template is addressed by its path relative to that directory
//! (`article.jinja`, `partials/nav.jinja`). Autoescaping is off: page bodies
//! are already HTML.

use std::{
    error::Error as _,
    path::{Path, PathBuf},
};

use pressmark_core::content::url_path;
use tera::Tera;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

pub use tera::Context as TemplateContext;

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template directory does not exist.
    #[error("template directory not found: {0}")]
    MissingDir(PathBuf),

    /// A template file failed to load or parse.
    #[error("failed to load templates from {dir}: {message}")]
    Load { dir: PathBuf, message: String },

    /// Walking the template directory failed.
    #[error("failed to read template directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// No template with that name is loaded.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Rendering failed.
    #[error("failed to render template {name}: {message}")]
    Render { name: String, message: String },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Named templates loaded from a directory.
#[derive(Debug)]
pub struct TemplateEngine {
    dir: Option<PathBuf>,
    tera: Tera,
}

impl TemplateEngine {
    /// Load every non-hidden file under `dir` as a template.
    pub fn load(dir: &Path) -> Result<Self> {
        let tera = load_dir(dir)?;
        Ok(Self {
            dir: Some(dir.to_path_buf()),
            tera,
        })
    }

    /// Build an engine from in-memory `(name, source)` pairs.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(sources).map_err(|e| TemplateError::Load {
            dir: PathBuf::new(),
            message: error_chain(&e),
        })?;

        Ok(Self { dir: None, tera })
    }

    /// Re-read the template directory, dropping templates that were removed.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(dir) = &self.dir {
            self.tera = load_dir(dir)?;
        }
        Ok(())
    }

    /// Whether a template with this name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Names of all loaded templates, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render a named template.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::Render {
                name: name.to_string(),
                message: error_chain(&e),
            })
    }
}

fn load_dir(dir: &Path) -> Result<Tera> {
    if !dir.is_dir() {
        return Err(TemplateError::MissingDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !entry.file_type().is_file() || hidden {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or_else(|_| entry.path());
        let name = url_path(relative);
        debug!(template = %name, "loading template");
        files.push((entry.path().to_path_buf(), Some(name)));
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_template_files(files)
        .map_err(|e| TemplateError::Load {
            dir: dir.to_path_buf(),
            message: error_chain(&e),
        })?;

    info!(
        dir = %dir.display(),
        count = tera.get_template_names().count(),
        "templates loaded"
    );
    Ok(tera)
}

/// Tera reports the useful detail in the source chain; flatten it.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
