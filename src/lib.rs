//! blog-writer: AI-assisted writing and API backend for a Sanity-powered blog
//!
//! This crate turns LLM drafts into CMS posts (labeled-section extraction,
//! rich-text block conversion, slug derivation) and serves the blog's small
//! HTTP API for content generation, contact messages and newsletter signups.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod llm;
pub mod server;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "blog.yml";

/// The main application
#[derive(Debug, Clone)]
pub struct BlogWriter {
    /// Writer configuration
    pub config: config::WriterConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Message overrides directory
    pub languages_dir: PathBuf,
}

impl BlogWriter {
    /// Create an instance from a directory; environment variables override the file
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::WriterConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::WriterConfig::default()
        };
        config.apply_process_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::WriterConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let languages_dir = base_dir.join("languages");
        Self {
            config,
            base_dir,
            languages_dir,
        }
    }

    /// Build the LLM client
    pub fn llm_client(&self) -> Result<llm::GroqClient> {
        llm::GroqClient::new(&self.config.llm)
    }

    /// Build the CMS client
    pub fn cms_client(&self) -> Result<cms::SanityClient> {
        cms::SanityClient::new(&self.config.sanity)
    }

    /// Message catalog in the configured language, with local overrides
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::new(self.config.site.language);
        i18n.load_languages(&self.languages_dir)?;
        Ok(i18n)
    }
}
