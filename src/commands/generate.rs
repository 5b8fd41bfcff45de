//! Generate an article draft

use anyhow::Result;

use crate::content::{convert_content, GeneratedArticle, PreviewRenderer};
use crate::llm::GenerationRequest;
use crate::BlogWriter;

/// How the draft is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    #[default]
    Json,
    /// HTML preview of the stored blocks; `raw_html` keeps HTML from the model
    Preview { raw_html: bool },
}

/// Call the model and print the draft
pub async fn run(writer: &BlogWriter, request: &GenerationRequest, output: Output) -> Result<GeneratedArticle> {
    let client = writer.llm_client()?;
    let article = client.generate(request).await?;

    if article.is_sparse() {
        let i18n = writer.i18n()?;
        eprintln!("{}", i18n.get("generate.empty"));
    }

    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&article)?),
        Output::Preview { raw_html } => println!("{}", render_preview(&article, raw_html)),
    }

    Ok(article)
}

/// Heading outline as an HTML comment, followed by the rendered body
pub fn render_preview(article: &GeneratedArticle, raw_html: bool) -> String {
    let renderer = PreviewRenderer::new().with_raw_html(raw_html);
    let blocks = convert_content(&article.content);
    let html = renderer.render_blocks(&blocks);

    let outline = renderer.outline(&article.content);
    if outline.is_empty() {
        return html;
    }
    let outline: Vec<String> = outline.iter().map(|h| format!("  - {}", h)).collect();
    format!("<!--\nOutline:\n{}\n-->\n{}", outline.join("\n"), html)
}
