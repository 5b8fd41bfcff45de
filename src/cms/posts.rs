//! Read-side post queries: pagination, search, single posts and filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::taxonomy::{Author, Category, AUTHOR_PROJECTION, CATEGORY_PROJECTION};
use super::{null_as_default, SanityClient};
use crate::error::{InputError, Result};

/// Largest page a listing serves
pub const MAX_PER_PAGE: usize = 100;

const POST_FILTER: &str = r#"_type == "post" && defined(slug.current)"#;
const POST_PROJECTION: &str = r#"{ _id, title, "slug": slug.current, excerpt, publishedAt, "author": author->name, "categories": categories[]->title }"#;

/// What the listing pages show for a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default().into_iter().flatten().collect())
}

/// A full post, as the article page shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    /// Stored rich-text blocks, kept as-is
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<Value>,
}

impl PostDetail {
    /// Text blocks written back as markdown paragraphs; non-text blocks are skipped
    pub fn body_markdown(&self) -> String {
        self.body
            .iter()
            .filter(|block| block["_type"] == "block")
            .filter_map(|block| {
                let text: String = block["children"]
                    .as_array()?
                    .iter()
                    .filter_map(|span| span["text"].as_str())
                    .collect();
                let prefix = match block["style"].as_str() {
                    Some("h1") => "# ",
                    Some("h2") => "## ",
                    Some("h3") => "### ",
                    Some("h4") => "#### ",
                    _ => "",
                };
                Some(format!("{}{}", prefix, text))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One page of posts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostSummary>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PostPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// 1-based page window; page 0 is read as page 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// `per_page` must be within `1..=MAX_PER_PAGE`
    pub fn new(page: usize, per_page: usize) -> Result<Self> {
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(InputError::PageSizeOutOfRange { max: MAX_PER_PAGE }.into());
        }
        Ok(Self {
            page: page.max(1),
            per_page,
        })
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Exclusive end of the slice
    pub fn end(&self) -> usize {
        self.offset().saturating_add(self.per_page)
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page.max(1))
    }
}

#[derive(Deserialize)]
struct PageResult {
    posts: Vec<PostSummary>,
    total: usize,
}

/// Fetch one page of published posts, newest first
pub async fn fetch_page(client: &SanityClient, pagination: Pagination) -> Result<PostPage> {
    let groq = format!(
        r#"{{ "posts": *[{filter}] | order(publishedAt desc) [$start...$end] {projection}, "total": count(*[{filter}]) }}"#,
        filter = POST_FILTER,
        projection = POST_PROJECTION
    );
    let params = [
        ("start", json!(pagination.offset())),
        ("end", json!(pagination.end())),
    ];

    let result: PageResult = client.query(&groq, &params).await?;
    tracing::debug!("Fetched {} of {} posts", result.posts.len(), result.total);

    Ok(PostPage {
        posts: result.posts,
        page: pagination.page,
        per_page: pagination.per_page,
        total: result.total,
        total_pages: pagination.total_pages(result.total),
    })
}

/// Prefix search over title, excerpt and body text
pub async fn search(client: &SanityClient, term: &str) -> Result<Vec<PostSummary>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let groq = format!(
        "*[{} && (title match $term || excerpt match $term || pt::text(body) match $term)] | order(publishedAt desc) {}",
        POST_FILTER, POST_PROJECTION
    );
    client
        .query(&groq, &[("term", json!(format!("{}*", term)))])
        .await
}

/// One post by slug, with its author and categories expanded
pub async fn fetch_post(client: &SanityClient, slug: &str) -> Result<Option<PostDetail>> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Ok(None);
    }

    let groq = format!(
        r#"*[_type == "post" && slug.current == $slug][0] {{ _id, title, "slug": slug.current, metaDescription, keywords, excerpt, publishedAt, "author": author->{author}, "categories": categories[]->{category}, body }}"#,
        author = AUTHOR_PROJECTION,
        category = CATEGORY_PROJECTION
    );
    client.query(&groq, &[("slug", json!(slug))]).await
}

/// Every published slug, for building post routes
pub async fn fetch_slugs(client: &SanityClient) -> Result<Vec<String>> {
    let groq = format!("*[{}].slug.current", POST_FILTER);
    client.query(&groq, &[]).await
}

/// Posts filed under a category slug, newest first
pub async fn posts_by_category(client: &SanityClient, slug: &str) -> Result<Vec<PostSummary>> {
    let groq = format!(
        "*[{} && $slug in categories[]->slug.current] | order(publishedAt desc) {}",
        POST_FILTER, POST_PROJECTION
    );
    client.query(&groq, &[("slug", json!(slug.trim()))]).await
}

/// Posts written by an author slug, newest first
pub async fn posts_by_author(client: &SanityClient, slug: &str) -> Result<Vec<PostSummary>> {
    let groq = format!(
        "*[{} && author->slug.current == $slug] | order(publishedAt desc) {}",
        POST_FILTER, POST_PROJECTION
    );
    client.query(&groq, &[("slug", json!(slug.trim()))]).await
}
