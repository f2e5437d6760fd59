//! pressmark core library
//!
//! Core types, front matter extraction, configuration and error handling for
//! the pressmark static site publisher.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{IndexEntry, RenderedDocument, SourceKind};
pub use error::{CoreError, Result};
pub use frontmatter::{Extracted, Metadata, MetadataProblem};
