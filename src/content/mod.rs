//! Content module - turns LLM drafts into CMS-ready posts

mod article;
mod blocks;
mod post;
mod preview;
mod slug;

pub use article::{extract_article, split_keywords, GeneratedArticle, Label};
pub use blocks::{
    blocks_to_markdown, classify_paragraph, convert_content, to_portable_text, ContentBlock,
    HeadingLevel, PortableTextBlock, Span,
};
pub use post::{PostDocument, SlugField};
pub use preview::PreviewRenderer;
pub use slug::{derive_slug, is_valid_slug, resolve_slug};
