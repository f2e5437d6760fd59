//! Site configuration management.
//!
//! Every field has a default, so a source tree without a `pressmark.toml`
//! publishes with the stock settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// File name looked up at the source root when no config path is given.
pub const CONFIG_FILE_NAME: &str = "pressmark.toml";

/// Main configuration structure for pressmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Template lookup settings.
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Index page settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Static asset settings.
    #[serde(default)]
    pub assets: AssetConfig,

    /// Local server settings (watch mode).
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote object store settings.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name, exposed to templates as `site_name`.
    #[serde(default = "default_site_name")]
    pub name: String,
}

/// Template configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template directory, relative to the source root.
    #[serde(default = "default_template_dir")]
    pub dir: String,

    /// Template used for documents without a `template` key.
    #[serde(default = "default_page_template")]
    pub default: String,

    /// Template used for the site index page.
    #[serde(default = "default_index_template")]
    pub index: String,
}

/// Ordering of entries on the site index page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOrder {
    /// Order in which documents were published (lexical walk order).
    #[default]
    Encounter,
    /// Newest `date` first; undated documents last.
    Date,
}

/// Index configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Category marking a document as rendered but not indexed.
    #[serde(default = "default_noindex_category")]
    pub noindex_category: String,

    /// Category given to documents without one.
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Entry order on the index page.
    #[serde(default)]
    pub order: IndexOrder,
}

/// Static asset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// File extensions copied verbatim (without the leading dot).
    #[serde(default = "default_asset_extensions")]
    pub extensions: Vec<String>,
}

/// Local server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the watch-mode server binds to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Remote object store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Bucket name; falls back to the `AWS_BUCKET` environment variable.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Mark uploaded objects publicly readable.
    #[serde(default = "default_true")]
    pub public_read: bool,

    /// Storage class applied to uploaded objects.
    #[serde(default = "default_storage_class")]
    pub storage_class: Option<String>,

    /// `Cache-Control` value applied to uploaded objects.
    #[serde(default = "default_cache_control")]
    pub cache_control: Option<String>,
}

// Default value functions
fn default_site_name() -> String {
    "pressmark".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_page_template() -> String {
    "article.jinja".to_string()
}

fn default_index_template() -> String {
    "index.jinja".to_string()
}

fn default_noindex_category() -> String {
    "noindex".to_string()
}

fn default_category() -> String {
    "Other stuff".to_string()
}

fn default_asset_extensions() -> Vec<String> {
    [
        "css", "js", "png", "jpg", "jpeg", "gif", "ico", "svg", "webp", "json", "xml",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

fn default_storage_class() -> Option<String> {
    Some("REDUCED_REDUNDANCY".to_string())
}

fn default_cache_control() -> Option<String> {
    Some("max-age=300".to_string())
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            default: default_page_template(),
            index: default_index_template(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            noindex_category: default_noindex_category(),
            default_category: default_category(),
            order: IndexOrder::default(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            extensions: default_asset_extensions(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            public_read: true,
            storage_class: default_storage_class(),
            cache_control: default_cache_control(),
        }
    }
}

impl Config {
    /// Load configuration layered with `PRESSMARK__SECTION__KEY` environment
    /// variables. Without a file, only defaults and the environment apply.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(CoreError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("PRESSMARK").separator("__"))
            .build()?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| CoreError::config_with_source("invalid configuration values", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `pressmark.toml` from the source root if present, defaults otherwise.
    pub fn discover(source_dir: &Path) -> Result<Self> {
        let candidate = source_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using site configuration");
            Self::load_with_env(Some(&candidate))
        } else {
            Self::load_with_env(None)
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.templates.default.is_empty() {
            return Err(CoreError::config("templates.default cannot be empty"));
        }

        if self.templates.index.is_empty() {
            return Err(CoreError::config("templates.index cannot be empty"));
        }

        if self.index.default_category.is_empty() {
            return Err(CoreError::config("index.default_category cannot be empty"));
        }

        if self.index.default_category == self.index.noindex_category {
            return Err(CoreError::config(
                "index.default_category must differ from index.noindex_category",
            ));
        }

        if self.assets.extensions.iter().any(|ext| ext.starts_with('.')) {
            tracing::warn!("assets.extensions entries should not include the leading dot");
        }

        Ok(())
    }
}

/// Normalize a link prefix: empty stays empty, otherwise it starts with `/`
/// and has no trailing `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
