//! pressmark generator library
//!
//! Publishing engine: turns a source tree of Markdown documents, templates
//! and static assets into a tree of HTML pages.
//!
//! - [`template`]: named tera templates loaded from the source tree
//! - [`convert`]: one Markdown document to one HTML page
//! - [`assets`]: byte-for-byte copy of allow-listed files
//! - [`indexer`]: site index and directory listings
//! - [`publish`]: full-tree and single-file publishing
//! - [`upload`]: object store upload of the published tree

pub mod assets;
pub mod convert;
pub mod indexer;
pub mod publish;
pub mod template;
pub mod upload;

pub use assets::AssetCopier;
pub use convert::{DocumentConverter, DocumentOutcome};
pub use indexer::Indexer;
pub use publish::{DocumentFailure, FileOutcome, PublishReport, PublishRun, Publisher};
pub use template::TemplateEngine;
pub use upload::{UploadStats, Uploader};
