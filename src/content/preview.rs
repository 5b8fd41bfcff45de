//! HTML preview of generated drafts

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

use super::blocks::{blocks_to_markdown, ContentBlock};

/// Renders article bodies to HTML for review before publishing
pub struct PreviewRenderer {
    options: Options,
    /// Keep raw HTML from the model instead of escaping it
    allow_html: bool,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_SMART_PUNCTUATION,
            allow_html: false,
        }
    }

    pub fn with_raw_html(mut self, allow: bool) -> Self {
        self.allow_html = allow;
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let events = parser.map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) if !self.allow_html => Event::Text(raw),
            other => other,
        });

        let mut html_output = String::new();
        html::push_html(&mut html_output, events);
        html_output
    }

    /// Render what the CMS will actually store for these blocks
    pub fn render_blocks(&self, blocks: &[ContentBlock]) -> String {
        self.render(&blocks_to_markdown(blocks))
    }

    /// Collect the heading texts of a body, in order
    pub fn outline(&self, markdown: &str) -> Vec<String> {
        let mut headings = Vec::new();
        let mut current: Option<String> = None;

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(text) = current.take() {
                        headings.push(text);
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(buf) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        headings
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::convert_content;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = PreviewRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_raw_html_is_escaped_by_default() {
        let renderer = PreviewRenderer::new();
        let html = renderer.render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));

        let html = PreviewRenderer::new()
            .with_raw_html(true)
            .render("<div>ok</div>");
        assert!(html.contains("<div>ok</div>"));
    }

    #[test]
    fn test_render_blocks() {
        let renderer = PreviewRenderer::new();
        let blocks = convert_content("## Part\n\nSome *text*");
        let html = renderer.render_blocks(&blocks);
        assert!(html.contains("<h2>Part</h2>"));
        assert!(html.contains("<p>Some <em>text</em></p>"));
    }

    #[test]
    fn test_outline() {
        let renderer = PreviewRenderer::new();
        let outline = renderer.outline("# Titre\n\nIntro\n\n## Partie `un`\n\nTexte\n\n### Détail");
        assert_eq!(outline, vec!["Titre", "Partie un", "Détail"]);
    }
}
