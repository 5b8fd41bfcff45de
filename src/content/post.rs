//! Post documents as stored in the CMS

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::GeneratedArticle;
use super::blocks::{convert_content, to_portable_text, PortableTextBlock};
use super::slug::resolve_slug;
use crate::error::{InputError, Result};

/// Recommended upper bound for titles
pub const TITLE_MAX_CHARS: usize = 60;
/// Recommended length range for meta descriptions
pub const META_DESCRIPTION_CHARS: std::ops::RangeInclusive<usize> = 150..=160;
/// Recommended upper bound for excerpts
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Slug object as the CMS expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugField {
    #[serde(rename = "_type")]
    pub kind: String,
    pub current: String,
}

impl SlugField {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            kind: "slug".to_string(),
            current: current.into(),
        }
    }
}

/// A blog post ready to be created in the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,

    /// Post title
    pub title: String,

    /// URL slug
    pub slug: SlugField,

    /// SEO meta description
    pub meta_description: String,

    /// SEO keywords
    pub keywords: Vec<String>,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Rich-text body
    pub body: Vec<PortableTextBlock>,

    /// Publication date
    pub published_at: DateTime<Utc>,
}

impl PostDocument {
    /// Build a post from a generated draft.
    ///
    /// The model's slug is used when it is already canonical, otherwise one
    /// is derived from the title.
    pub fn from_generated(
        title: &str,
        article: &GeneratedArticle,
        published_at: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InputError::TitleRequired.into());
        }

        let slug = resolve_slug(&article.slug, title);
        if slug.is_empty() {
            return Err(InputError::EmptySlug(title.to_string()).into());
        }

        let blocks = convert_content(&article.content);

        Ok(Self {
            doc_type: "post".to_string(),
            title: title.to_string(),
            slug: SlugField::new(slug),
            meta_description: article.meta_description.clone(),
            keywords: article.keywords.clone(),
            excerpt: article.excerpt.clone(),
            body: to_portable_text(&blocks),
            published_at,
        })
    }

    /// Editorial warnings about SEO field lengths; never blocks publishing
    pub fn seo_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let title_len = self.title.chars().count();
        if title_len > TITLE_MAX_CHARS {
            warnings.push(format!(
                "title is {} characters, keep it under {}",
                title_len, TITLE_MAX_CHARS
            ));
        }

        let meta_len = self.meta_description.chars().count();
        if !META_DESCRIPTION_CHARS.contains(&meta_len) {
            warnings.push(format!(
                "meta description is {} characters, aim for {}-{}",
                meta_len,
                META_DESCRIPTION_CHARS.start(),
                META_DESCRIPTION_CHARS.end()
            ));
        }

        let excerpt_len = self.excerpt.chars().count();
        if excerpt_len > EXCERPT_MAX_CHARS {
            warnings.push(format!(
                "excerpt is {} characters, keep it under {}",
                excerpt_len, EXCERPT_MAX_CHARS
            ));
        }

        if self.body.is_empty() {
            warnings.push("body is empty".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    fn article() -> GeneratedArticle {
        GeneratedArticle {
            content: "# Titre\n\nIntro.".to_string(),
            meta_description: "x".repeat(155),
            slug: "Not A Slug".to_string(),
            keywords: vec!["rust".to_string()],
            excerpt: "Court.".to_string(),
        }
    }

    #[test]
    fn test_from_generated() {
        let date = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let post = PostDocument::from_generated("  Guide Rust : Édition 2025 ", &article(), date).unwrap();
        assert_eq!(post.title, "Guide Rust : Édition 2025");
        assert_eq!(post.slug.current, "guide-rust-edition-2025");
        assert_eq!(post.body.len(), 2);
        assert_eq!(post.body[0].style, "h1");
        assert!(post.seo_warnings().is_empty());

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["_type"], "post");
        assert_eq!(json["slug"]["_type"], "slug");
        assert_eq!(json["metaDescription"].as_str().unwrap().len(), 155);
        assert_eq!(json["publishedAt"], "2025-01-02T03:04:05Z");
    }

    #[test]
    fn test_keeps_canonical_suggested_slug() {
        let mut draft = article();
        draft.slug = "guide-rust".to_string();
        let post = PostDocument::from_generated("Un autre titre", &draft, Utc::now()).unwrap();
        assert_eq!(post.slug.current, "guide-rust");
    }

    #[test]
    fn test_rejects_unusable_titles() {
        assert!(matches!(
            PostDocument::from_generated("   ", &article(), Utc::now()),
            Err(Error::Validation(InputError::TitleRequired))
        ));
        assert!(matches!(
            PostDocument::from_generated("???", &article(), Utc::now()),
            Err(Error::Validation(InputError::EmptySlug(_)))
        ));
    }

    #[test]
    fn test_seo_warnings() {
        let draft = GeneratedArticle {
            excerpt: "e".repeat(201),
            ..Default::default()
        };
        let post = PostDocument::from_generated(&"t".repeat(61), &draft, Utc::now()).unwrap();
        let warnings = post.seo_warnings();
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].starts_with("title"));
        assert!(warnings[1].starts_with("meta description is 0"));
    }
}
