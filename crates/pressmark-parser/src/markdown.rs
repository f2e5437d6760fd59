//! Markdown rendering using pulldown-cmark.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::syntax::SyntaxHighlighter;

/// Markdown to HTML renderer with highlighted fenced code.
///
/// Tables, footnotes, strikethrough and task lists are enabled. Math
/// extensions are not: `$` stays literal text so pages can detect it.
#[derive(Debug)]
pub struct MarkdownRenderer {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with the default extension set.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            highlighter: SyntaxHighlighter::default(),
            options,
        }
    }

    /// Render a Markdown body (front matter already removed) to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlighter.highlight(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");

        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_fenced_code() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```\n");

        assert!(html.contains("codehilite"));
        assert!(html.contains("language-rust"));
        assert!(!html.contains("<pre><code class=\"language-rust\">fn"));
    }

    #[test]
    fn test_table_rendering() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| A | B |\n|---|---|\n| 1 | 2 |\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_footnotes() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Text[^1].\n\n[^1]: The note.\n");

        assert!(html.contains("footnote"));
    }

    #[test]
    fn test_dollar_sign_kept() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Costs $5 or $x^2$.");

        assert!(html.contains("$5"));
        assert!(html.contains("$x^2$"));
    }
}
