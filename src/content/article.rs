//! Labeled-section extraction from LLM completions

use serde::{Deserialize, Serialize};

/// An article draft recovered from one completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedArticle {
    /// Raw markdown-ish body
    pub content: String,

    /// SEO description, ideally 150-160 characters
    pub meta_description: String,

    /// Slug suggested by the model
    pub slug: String,

    /// Keywords in extraction order, duplicates kept
    pub keywords: Vec<String>,

    /// Short summary of 2-3 sentences
    pub excerpt: String,
}

impl GeneratedArticle {
    /// True when the completion carried none of the labeled sections
    pub fn is_sparse(&self) -> bool {
        self.content.is_empty()
            && self.meta_description.is_empty()
            && self.slug.is_empty()
            && self.keywords.is_empty()
            && self.excerpt.is_empty()
    }
}

/// Section markers understood by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    MetaDescription,
    Slug,
    Keywords,
    Excerpt,
    Content,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::MetaDescription,
        Label::Slug,
        Label::Keywords,
        Label::Excerpt,
        Label::Content,
    ];

    /// The literal marker, colon included
    pub fn marker(&self) -> &'static str {
        match self {
            Label::MetaDescription => "META_DESCRIPTION:",
            Label::Slug => "SLUG:",
            Label::Keywords => "KEYWORDS:",
            Label::Excerpt => "EXCERPT:",
            Label::Content => "CONTENT:",
        }
    }

    /// Find the label a cleaned section starts with
    fn match_prefix(section: &str) -> Option<Label> {
        Label::ALL
            .into_iter()
            .find(|label| section.starts_with(label.marker()))
    }
}

/// Recover the labeled sections of a completion.
///
/// The text is cut at blank lines and each piece is matched, after removing
/// `**`, against the known markers. A later section with the same label
/// overwrites an earlier one. `CONTENT:` is the exception: its value is
/// everything after the first `CONTENT:` of the unsplit text, so the body
/// keeps all of its paragraphs. Missing sections stay empty.
pub fn extract_article(text: &str) -> GeneratedArticle {
    let mut article = GeneratedArticle::default();
    let mut raw_keywords = String::new();

    for section in text.split("\n\n") {
        let cleaned = section.replace("**", "");
        let cleaned = cleaned.trim();

        let Some(label) = Label::match_prefix(cleaned) else {
            continue;
        };
        let value = cleaned[label.marker().len()..].trim();

        match label {
            Label::MetaDescription => article.meta_description = value.to_string(),
            Label::Slug => article.slug = value.to_string(),
            Label::Keywords => raw_keywords = value.to_string(),
            Label::Excerpt => article.excerpt = value.to_string(),
            Label::Content => {
                article.content = match text.find(Label::Content.marker()) {
                    Some(pos) => text[pos + Label::Content.marker().len()..]
                        .trim()
                        .to_string(),
                    // The marker only appeared once the bold markers were gone
                    None => value.to_string(),
                };
            }
        }
    }

    article.keywords = split_keywords(&raw_keywords);

    tracing::debug!(
        "Extracted article: slug={:?}, {} keywords, {} content bytes",
        article.slug,
        article.keywords.len(),
        article.content.len()
    );

    article
}

/// Split a comma separated keyword list, dropping blank entries
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_sections() {
        let text = "META_DESCRIPTION: Hello world\n\nSLUG: hello-world\n\nCONTENT:\n# Title\n\nBody text.";
        let article = extract_article(text);
        assert_eq!(article.meta_description, "Hello world");
        assert_eq!(article.slug, "hello-world");
        assert_eq!(article.content, "# Title\n\nBody text.");
        assert!(article.keywords.is_empty());
        assert_eq!(article.excerpt, "");
    }

    #[test]
    fn test_missing_labels_are_empty() {
        let article = extract_article("Just some narrative text.\n\nNothing labeled here.");
        assert_eq!(article, GeneratedArticle::default());
        assert!(article.is_sparse());

        let article = extract_article("");
        assert!(article.is_sparse());
    }

    #[test]
    fn test_keywords_keep_order_and_duplicates() {
        let article = extract_article("KEYWORDS: React, , JavaScript ,React");
        assert_eq!(article.keywords, vec!["React", "JavaScript", "React"]);
    }

    #[test]
    fn test_bold_markers_are_ignored() {
        let text = "**META_DESCRIPTION:** A **bold** claim\n\n**EXCERPT:** Short.";
        let article = extract_article(text);
        assert_eq!(article.meta_description, "A bold claim");
        assert_eq!(article.excerpt, "Short.");
    }

    #[test]
    fn test_last_label_wins() {
        let text = "SLUG: first\n\nSLUG: second\n\nKEYWORDS: a, b\n\nKEYWORDS: c";
        let article = extract_article(text);
        assert_eq!(article.slug, "second");
        assert_eq!(article.keywords, vec!["c"]);
    }

    #[test]
    fn test_content_spans_following_sections() {
        let text = "Voici votre article.\n\nMETA_DESCRIPTION: Desc\n\nEXCERPT: Un. Deux.\n\nCONTENT:\n# Titre\n\nIntro.\n\n## Partie\n\nSuite.\n\nSLUG: late-slug";
        let article = extract_article(text);
        assert_eq!(
            article.content,
            "# Titre\n\nIntro.\n\n## Partie\n\nSuite.\n\nSLUG: late-slug"
        );
        // Sections after CONTENT are still scanned on their own
        assert_eq!(article.slug, "late-slug");
        assert_eq!(article.excerpt, "Un. Deux.");
    }

    #[test]
    fn test_bold_content_label_keeps_trailing_markers() {
        use crate::content::{convert_content, ContentBlock};

        let article = extract_article("**SLUG:** s\n\n**CONTENT:**\n# Titre\n\nIntro.");
        assert_eq!(article.slug, "s");
        // The literal marker is found inside the bold label, so its closing `**` stays
        assert_eq!(article.content, "**\n# Titre\n\nIntro.");
        assert_eq!(
            convert_content(&article.content),
            vec![
                ContentBlock::Paragraph {
                    text: "**\n# Titre".to_string()
                },
                ContentBlock::Paragraph {
                    text: "Intro.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_content_marker_split_by_bold() {
        let article = extract_article("SLUG: s\n\nCONTENT**:** Corps du **texte**.\n\nSuite.");
        // No literal `CONTENT:` in the raw text: only the cleaned section is kept
        assert_eq!(article.content, "Corps du texte.");
        assert_eq!(article.slug, "s");
    }

    #[test]
    fn test_label_must_start_the_section() {
        let article = extract_article("The SLUG: is not at the start");
        assert_eq!(article.slug, "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let article = GeneratedArticle {
            meta_description: "d".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["metaDescription"], "d");
        assert!(json["keywords"].as_array().unwrap().is_empty());
    }
}
