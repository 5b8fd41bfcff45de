//! URL slugs for posts

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS_RE: Regex = Regex::new(r"-+").unwrap();
}

/// Derive a URL-safe slug from a title.
///
/// Accents are folded to their base letter, anything outside
/// `[a-z0-9]`, whitespace and `-` is dropped, and whitespace becomes `-`.
/// The result only contains `[a-z0-9-]` and never starts or ends with `-`.
pub fn derive_slug(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = WHITESPACE_RE.replace_all(&folded, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");

    collapsed.trim_matches('-').to_string()
}

/// Check that a slug is already in canonical form
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && derive_slug(slug) == slug
}

/// Pick the slug for a new post.
///
/// The suggested slug is kept when it is already canonical, otherwise the
/// slug is derived from the title.
pub fn resolve_slug(suggested: &str, title: &str) -> String {
    let suggested = suggested.trim();
    if is_valid_slug(suggested) {
        suggested.to_string()
    } else {
        if !suggested.is_empty() {
            tracing::debug!("Rejected suggested slug {:?}, deriving from title", suggested);
        }
        derive_slug(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug_french_title() {
        assert_eq!(
            derive_slug("Guide Complet de React 18 : Édition 2025!"),
            "guide-complet-de-react-18-edition-2025"
        );
    }

    #[test]
    fn test_derive_slug_edges() {
        assert_eq!(derive_slug("  --Hello   World--  "), "hello-world");
        assert_eq!(derive_slug("a - - b"), "a-b");
        assert_eq!(derive_slug("Ça va? Très bien, merci"), "ca-va-tres-bien-merci");
        assert_eq!(derive_slug("Node.js & TypeScript"), "nodejs-typescript");
        assert_eq!(derive_slug("C'est l'été"), "cest-lete");
        assert_eq!(derive_slug("tab\tand\nnewline"), "tab-and-newline");
    }

    #[test]
    fn test_derive_slug_empty_without_alphanumerics() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!! ??? ---"), "");
        assert_eq!(derive_slug("日本語"), "");
    }

    #[test]
    fn test_derive_slug_is_idempotent() {
        let titles = [
            "Guide Complet de React 18 : Édition 2025!",
            "  --Hello   World--  ",
            "Über straße Ñandú",
            "123 Go!",
            "-",
            "émoji 🚀 rocket",
            "MiXeD-CaSe__under_scores",
        ];
        for title in titles {
            let once = derive_slug(title);
            assert_eq!(derive_slug(&once), once, "not idempotent for {:?}", title);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!once.starts_with('-') && !once.ends_with('-'));
        }
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug("hello-world", "Other Title"), "hello-world");
        assert_eq!(resolve_slug(" hello-world ", "Other Title"), "hello-world");
        assert_eq!(resolve_slug("Hello World!", "Other Title"), "other-title");
        assert_eq!(resolve_slug("", "Other Title"), "other-title");
        assert!(!is_valid_slug(""));
        assert!(is_valid_slug("a-1"));
    }
}
