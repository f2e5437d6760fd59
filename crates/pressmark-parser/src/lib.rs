//! pressmark parser library
//!
//! Markdown rendering with class-based syntax highlighting.

pub mod markdown;
pub mod syntax;

pub use markdown::MarkdownRenderer;
pub use syntax::SyntaxHighlighter;
