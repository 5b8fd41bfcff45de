//! Show one post from the CMS

use anyhow::Result;

use crate::cms::posts::{self, PostDetail};
use crate::content::PreviewRenderer;
use crate::BlogWriter;

/// Header lines and markdown body of a post
pub fn format_post(post: &PostDetail) -> String {
    let mut lines = vec![format!("{} [{}]", post.title, post.slug)];
    if let Some(date) = post.published_at {
        lines.push(format!("Published: {}", date.format("%Y-%m-%d")));
    }
    if let Some(author) = &post.author {
        lines.push(format!("Author: {}", author.name));
    }
    if !post.categories.is_empty() {
        let titles: Vec<&str> = post.categories.iter().map(|c| c.title.as_str()).collect();
        lines.push(format!("Categories: {}", titles.join(", ")));
    }
    if !post.keywords.is_empty() {
        lines.push(format!("Keywords: {}", post.keywords.join(", ")));
    }
    if let Some(description) = &post.meta_description {
        lines.push(format!("Description: {}", description));
    }

    format!("{}\n\n{}", lines.join("\n"), post.body_markdown())
}

/// Print a post as text, or its body as HTML
pub async fn run(writer: &BlogWriter, slug: &str, html: bool) -> Result<()> {
    let client = writer.cms_client()?;
    let Some(post) = posts::fetch_post(&client, slug).await? else {
        anyhow::bail!("Post not found: {}", slug);
    };

    if html {
        println!("{}", PreviewRenderer::new().render(&post.body_markdown()));
    } else {
        println!("{}", format_post(&post));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_post() {
        let post: PostDetail = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Bonjour",
            "slug": "bonjour",
            "publishedAt": "2025-02-03T10:00:00Z",
            "keywords": ["rust", "web"],
            "categories": [{ "_id": "c1", "title": "Dev", "slug": "dev" }],
            "body": [{ "_type": "block", "style": "normal", "children": [{ "text": "Salut." }] }]
        }))
        .unwrap();

        assert_eq!(
            format_post(&post),
            "Bonjour [bonjour]\nPublished: 2025-02-03\nCategories: Dev\nKeywords: rust, web\n\nSalut."
        );
    }
}
