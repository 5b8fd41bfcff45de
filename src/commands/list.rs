//! List blog content from the CMS

use anyhow::Result;

use crate::cms::posts::{self, Pagination, PostSummary};
use crate::cms::taxonomy;
use crate::BlogWriter;

/// Which posts to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    Page { page: usize, per_page: usize },
    Search(String),
    Category(String),
    Author(String),
}

fn print_post(post: &PostSummary) {
    let date = post
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let mut line = format!("  {} - {} [{}]", date, post.title, post.slug);
    if let Some(author) = &post.author {
        line.push_str(&format!(" by {}", author));
    }
    if !post.categories.is_empty() {
        line.push_str(&format!(" ({})", post.categories.join(", ")));
    }
    println!("{}", line);
}

fn print_posts(heading: String, posts: &[PostSummary]) {
    println!("{}", heading);
    for post in posts {
        print_post(post);
    }
}

/// List posts, categories or authors
pub async fn run(writer: &BlogWriter, content_type: &str, filter: PostFilter) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let client = writer.cms_client()?;

            match filter {
                PostFilter::Page { page, per_page } => {
                    let pagination = Pagination::new(page, per_page)?;
                    let page = posts::fetch_page(&client, pagination).await?;
                    print_posts(
                        format!(
                            "Posts ({}), page {}/{}:",
                            page.total,
                            page.page,
                            page.total_pages.max(1)
                        ),
                        &page.posts,
                    );
                    if page.has_prev() {
                        println!("Previous: --page {}", page.page - 1);
                    }
                    if page.has_next() {
                        println!("Next: --page {}", page.page + 1);
                    }
                }
                PostFilter::Search(term) => {
                    let results = posts::search(&client, &term).await?;
                    print_posts(
                        format!("Posts matching {:?} ({}):", term.trim(), results.len()),
                        &results,
                    );
                }
                PostFilter::Category(slug) => {
                    let Some(category) = taxonomy::fetch_category(&client, &slug).await? else {
                        anyhow::bail!("Unknown category: {}", slug);
                    };
                    let results = posts::posts_by_category(&client, &category.slug).await?;
                    print_posts(
                        format!("Posts in {} ({}):", category.title, results.len()),
                        &results,
                    );
                }
                PostFilter::Author(slug) => {
                    let results = posts::posts_by_author(&client, &slug).await?;
                    print_posts(
                        format!("Posts by {} ({}):", slug.trim(), results.len()),
                        &results,
                    );
                }
            }
        }
        "category" | "categories" => {
            let client = writer.cms_client()?;
            let categories = taxonomy::fetch_categories(&client).await?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                match category.description {
                    Some(description) => {
                        println!("  {} [{}] - {}", category.title, category.slug, description)
                    }
                    None => println!("  {} [{}]", category.title, category.slug),
                }
            }
        }
        "author" | "authors" => {
            let client = writer.cms_client()?;
            let authors = taxonomy::fetch_authors(&client).await?;
            println!("Authors ({}):", authors.len());
            for author in authors {
                println!("  {} [{}]", author.name, author.slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category, author",
                content_type
            );
        }
    }

    Ok(())
}
