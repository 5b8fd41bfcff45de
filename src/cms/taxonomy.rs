//! Categories and authors

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{null_as_default, SanityClient};
use crate::error::Result;

pub(crate) const CATEGORY_PROJECTION: &str =
    r#"{ _id, title, "slug": slug.current, description }"#;
pub(crate) const AUTHOR_PROJECTION: &str =
    r#"{ _id, name, "slug": slug.current, "bio": pt::text(bio) }"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Biography flattened to plain text
    #[serde(default)]
    pub bio: Option<String>,
}

/// All categories, by title
pub async fn fetch_categories(client: &SanityClient) -> Result<Vec<Category>> {
    let groq = format!(
        r#"*[_type == "category" && defined(slug.current)] | order(title asc) {}"#,
        CATEGORY_PROJECTION
    );
    client.query(&groq, &[]).await
}

/// One category by slug
pub async fn fetch_category(client: &SanityClient, slug: &str) -> Result<Option<Category>> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Ok(None);
    }

    let groq = format!(
        r#"*[_type == "category" && slug.current == $slug][0] {}"#,
        CATEGORY_PROJECTION
    );
    client.query(&groq, &[("slug", json!(slug))]).await
}

/// All authors, by name
pub async fn fetch_authors(client: &SanityClient) -> Result<Vec<Author>> {
    let groq = format!(
        r#"*[_type == "author"] | order(name asc) {}"#,
        AUTHOR_PROJECTION
    );
    client.query(&groq, &[]).await
}
