//! Upload of a published tree to an object store.
//!
//! Every file under the target root becomes one object at
//! `<prefix>/<relative path>`. Uploads are sequential and the first failure
//! stops the walk.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use http::{HeaderMap, HeaderName, HeaderValue};
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload,
    aws::AmazonS3Builder, path::Path as ObjectPath,
};
use pressmark_core::{config::UploadConfig, content::url_path};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Upload errors. All of them abort the upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Reading a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Walking the target tree failed.
    #[error("failed to walk target tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The object store rejected a request.
    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),

    /// A local path does not form a valid object key.
    #[error("invalid object key {key}: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },

    /// The store could not be configured.
    #[error("upload configuration error: {0}")]
    Config(String),
}

/// Result type for upload operations.
pub type Result<T> = std::result::Result<T, UploadError>;

/// Totals of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadStats {
    /// Objects written.
    pub files: usize,

    /// Bytes written.
    pub bytes: u64,
}

/// ACL and storage class headers sent with every request.
pub fn default_headers(config: &UploadConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if config.public_read {
        headers.insert(
            HeaderName::from_static("x-amz-acl"),
            HeaderValue::from_static("public-read"),
        );
    }
    if let Some(class) = &config.storage_class {
        let value = HeaderValue::from_str(class)
            .map_err(|e| UploadError::Config(format!("invalid storage class {class:?}: {e}")))?;
        headers.insert(HeaderName::from_static("x-amz-storage-class"), value);
    }
    Ok(headers)
}

/// Build an S3 store from `AWS_*` environment variables.
///
/// The bucket comes from `config.bucket` when set, otherwise `AWS_BUCKET`.
pub fn s3_store_from_env(config: &UploadConfig) -> Result<Arc<dyn ObjectStore>> {
    let headers = default_headers(config)?;
    let mut builder = AmazonS3Builder::from_env()
        .with_client_options(ClientOptions::new().with_default_headers(headers));
    if let Some(bucket) = &config.bucket {
        builder = builder.with_bucket_name(bucket);
    }

    let store = builder
        .build()
        .map_err(|e| UploadError::Config(e.to_string()))?;
    Ok(Arc::new(store))
}

/// Key prefix for a base URL: its path without surrounding slashes.
///
/// `/blog/` → `blog`, `https://example.com/blog` → `blog`, `` → ``.
pub fn key_prefix(base_url: &str) -> String {
    let path = match base_url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
        None => base_url,
    };
    path.trim_matches('/').to_string()
}

/// Content type for a file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Uploads a directory tree into an object store under a key prefix.
#[derive(Debug)]
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    cache_control: Option<String>,
}

impl Uploader {
    /// Create an uploader writing below `prefix`.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
            cache_control: None,
        }
    }

    /// Set the `Cache-Control` attribute of uploaded objects.
    #[must_use]
    pub fn with_cache_control(mut self, value: Option<String>) -> Self {
        self.cache_control = value;
        self
    }

    /// Object key for a path relative to the uploaded root.
    pub fn object_key(&self, relative: &Path) -> Result<ObjectPath> {
        let relative = url_path(relative);
        let key = if self.prefix.is_empty() {
            relative
        } else {
            format!("{}/{relative}", self.prefix)
        };

        ObjectPath::parse(&key).map_err(|source| UploadError::InvalidKey { key, source })
    }

    /// Upload every file under `root`, in lexical order.
    pub async fn upload_tree(&self, root: &Path) -> Result<UploadStats> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        info!(root = %root.display(), files = files.len(), prefix = %self.prefix, "uploading");

        let mut stats = UploadStats::default();
        for path in files {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let key = self.object_key(relative)?;
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| UploadError::Io {
                    path: path.clone(),
                    source,
                })?;
            let size = bytes.len() as u64;

            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type_for(&path).into());
            if let Some(cache_control) = &self.cache_control {
                attributes.insert(Attribute::CacheControl, cache_control.clone().into());
            }
            let opts = PutOptions {
                attributes,
                ..Default::default()
            };

            self.store
                .put_opts(&key, PutPayload::from(bytes), opts)
                .await?;
            debug!(key = %key, bytes = size, "uploaded");

            stats.files += 1;
            stats.bytes += size;
        }

        info!(files = stats.files, bytes = stats.bytes, "upload complete");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use object_store::memory::InMemory;
    use tempfile::TempDir;

    use super::*;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("posts/a.html"), "<p>a</p>").unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();
        dir
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix(""), "");
        assert_eq!(key_prefix("/"), "");
        assert_eq!(key_prefix("/blog/"), "blog");
        assert_eq!(key_prefix("/a/b"), "a/b");
        assert_eq!(key_prefix("https://example.com/blog/"), "blog");
        assert_eq!(key_prefix("https://example.com"), "");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("a.CSS")), "text/css");
        assert_eq!(content_type_for(Path::new("a.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers(&UploadConfig::default()).unwrap();
        assert_eq!(headers.get("x-amz-acl").unwrap(), "public-read");
        assert_eq!(
            headers.get("x-amz-storage-class").unwrap(),
            "REDUCED_REDUNDANCY"
        );

        let private = UploadConfig {
            public_read: false,
            storage_class: None,
            ..UploadConfig::default()
        };
        assert!(default_headers(&private).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_storage_class() {
        let config = UploadConfig {
            bucket: Some("site".to_string()),
            storage_class: Some("REDUCED\nREDUNDANCY".to_string()),
            ..UploadConfig::default()
        };

        assert!(matches!(default_headers(&config), Err(UploadError::Config(_))));
        assert!(matches!(
            s3_store_from_env(&config),
            Err(UploadError::Config(msg)) if msg.contains("invalid storage class")
        ));
    }

    #[test]
    fn test_object_key() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let uploader = Uploader::new(store.clone(), "/blog/");
        assert_eq!(
            uploader.object_key(Path::new("posts/a.html")).unwrap().as_ref(),
            "blog/posts/a.html"
        );

        let bare = Uploader::new(store, "");
        assert_eq!(
            bare.object_key(Path::new("index.html")).unwrap().as_ref(),
            "index.html"
        );
    }

    #[tokio::test]
    async fn test_upload_tree_with_prefix() {
        let dir = tree();
        let store = Arc::new(InMemory::new());
        let uploader = Uploader::new(store.clone(), "blog")
            .with_cache_control(Some("max-age=300".to_string()));

        let stats = uploader.upload_tree(dir.path()).await.unwrap();
        assert_eq!(stats.files, 3);
        assert_eq!(stats.bytes, 13 + 8 + 7);

        let page = store
            .get(&ObjectPath::from("blog/posts/a.html"))
            .await
            .unwrap();
        let content_type = page
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| AsRef::<str>::as_ref(v).to_string());
        let cache_control = page
            .attributes
            .get(&Attribute::CacheControl)
            .map(|v| AsRef::<str>::as_ref(v).to_string());
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(cache_control.as_deref(), Some("max-age=300"));
        assert_eq!(page.bytes().await.unwrap().as_ref(), b"<p>a</p>");

        let css = store.get(&ObjectPath::from("blog/style.css")).await.unwrap();
        let content_type = css
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| AsRef::<str>::as_ref(v).to_string());
        assert_eq!(content_type.as_deref(), Some("text/css"));
    }

    #[tokio::test]
    async fn test_upload_tree_without_prefix() {
        let dir = tree();
        let store = Arc::new(InMemory::new());

        Uploader::new(store.clone(), "")
            .upload_tree(dir.path())
            .await
            .unwrap();

        assert!(store.head(&ObjectPath::from("index.html")).await.is_ok());
        assert!(store.head(&ObjectPath::from("posts/a.html")).await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_missing_root() {
        let store = Arc::new(InMemory::new());
        let result = Uploader::new(store, "")
            .upload_tree(Path::new("/nonexistent/target"))
            .await;
        assert!(matches!(result, Err(UploadError::Walk(_))));
    }
}
