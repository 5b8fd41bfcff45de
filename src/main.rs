//! CLI entry point for blog-writer

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_writer::commands::generate::Output;
use blog_writer::commands::list::PostFilter;
use blog_writer::llm::{ArticleType, GenerationRequest};

#[derive(Parser)]
#[command(name = "blog-writer")]
#[command(version)]
#[command(about = "AI-assisted writer and API backend for a Sanity-powered blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that call the model
#[derive(Args)]
struct DraftArgs {
    /// Title of the article
    title: String,

    /// Article type (tutoriel, guide, analyse, actualite, comparaison, opinion, interview, retour-experience)
    #[arg(short = 't', long = "type", default_value = "tutoriel", value_parser = parse_article_type)]
    article_type: ArticleType,

    /// Keywords to include, comma separated
    #[arg(short, long)]
    keywords: Option<String>,

    /// Extra instructions for the model
    #[arg(short, long)]
    prompt: Option<String>,
}

impl DraftArgs {
    fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            title: self.title,
            prompt: self.prompt,
            article_type: self.article_type,
            keywords: self.keywords,
        }
    }
}

fn parse_article_type(value: &str) -> Result<ArticleType, String> {
    value.parse()
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved completion (file or stdin) into an article and blocks
    Parse {
        /// Completion text file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Also print the CMS rich-text body
        #[arg(short, long)]
        blocks: bool,
    },

    /// Derive a URL slug from a title
    Slug {
        /// Title to convert
        title: String,
    },

    /// Generate an article draft with the model
    #[command(alias = "g")]
    Generate {
        #[command(flatten)]
        draft: DraftArgs,

        /// Print an HTML preview of the body instead of JSON
        #[arg(long)]
        preview: bool,

        /// Keep raw HTML from the model in the preview
        #[arg(long, requires = "preview")]
        raw_html: bool,
    },

    /// Generate an article and create it in the CMS
    Publish {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// List content stored in the CMS
    List {
        /// Type of content to list (post, category, author)
        #[arg(default_value = "post")]
        r#type: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Posts per page (1-100)
        #[arg(long, default_value = "10")]
        per_page: usize,

        /// Search posts instead of listing a page
        #[arg(short, long, conflicts_with_all = ["category", "author"])]
        search: Option<String>,

        /// Only posts in this category slug
        #[arg(long, conflicts_with = "author")]
        category: Option<String>,

        /// Only posts by this author slug
        #[arg(long)]
        author: Option<String>,
    },

    /// Show one post by slug
    Show {
        /// Post slug
        slug: String,

        /// Print the body as HTML
        #[arg(long)]
        html: bool,
    },

    /// Start the HTTP API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_writer=debug,info"
    } else {
        "blog_writer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Parse { file, blocks } => {
            blog_writer::commands::parse::run(file.as_deref(), blocks)?;
        }

        Commands::Slug { title } => {
            println!("{}", blog_writer::content::derive_slug(&title));
        }

        Commands::Generate {
            draft,
            preview,
            raw_html,
        } => {
            let writer = blog_writer::BlogWriter::new(&base_dir)?;
            let request = draft.into_request();
            let output = if preview {
                Output::Preview { raw_html }
            } else {
                Output::Json
            };
            tracing::info!("Generating draft for: {}", request.title);
            blog_writer::commands::generate::run(&writer, &request, output).await?;
        }

        Commands::Publish { draft } => {
            let writer = blog_writer::BlogWriter::new(&base_dir)?;
            let request = draft.into_request();
            blog_writer::commands::publish::run(&writer, &request).await?;
        }

        Commands::List {
            r#type,
            page,
            per_page,
            search,
            category,
            author,
        } => {
            let writer = blog_writer::BlogWriter::new(&base_dir)?;
            let filter = match (search, category, author) {
                (Some(term), _, _) => PostFilter::Search(term),
                (_, Some(slug), _) => PostFilter::Category(slug),
                (_, _, Some(slug)) => PostFilter::Author(slug),
                _ => PostFilter::Page { page, per_page },
            };
            blog_writer::commands::list::run(&writer, &r#type, filter).await?;
        }

        Commands::Show { slug, html } => {
            let writer = blog_writer::BlogWriter::new(&base_dir)?;
            blog_writer::commands::show::run(&writer, &slug, html).await?;
        }

        Commands::Serve { port, ip } => {
            let writer = blog_writer::BlogWriter::new(&base_dir)?;
            let port = port.unwrap_or(writer.config.server.port);
            let ip = ip.unwrap_or_else(|| writer.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_writer::server::start(&writer, &ip, port).await?;
        }

        Commands::Version => {
            println!("blog-writer version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
