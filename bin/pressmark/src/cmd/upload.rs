//! Upload command - copies the published tree to S3

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pressmark_core::config::UploadConfig;
use pressmark_generator::{
    UploadStats, Uploader,
    upload::{key_prefix, s3_store_from_env},
};

/// Upload `target` under the key prefix derived from `base_url`.
///
/// Credentials and region come from the usual `AWS_*` environment variables.
pub async fn run(target: &Path, base_url: &str, config: &UploadConfig) -> Result<UploadStats> {
    let prefix = key_prefix(base_url);
    tracing::info!(?target, prefix, bucket = ?config.bucket, "Starting upload");

    let store = s3_store_from_env(config).wrap_err("Failed to configure object store")?;
    let stats = Uploader::new(store, prefix)
        .with_cache_control(config.cache_control.clone())
        .upload_tree(target)
        .await
        .wrap_err("Upload failed")?;

    println!(
        "  ✓ Uploaded {} files ({} bytes)",
        stats.files, stats.bytes
    );
    Ok(stats)
}
