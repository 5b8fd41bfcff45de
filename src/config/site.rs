//! Writer configuration (blog.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::i18n::Lang;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub site: SiteConfig,
    pub llm: LlmConfig,
    pub sanity: SanityConfig,
    pub server: ServerConfig,
}

impl WriterConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: WriterConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Override secrets and project settings from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Override settings from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("GROQ_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(token) = get("SANITY_API_TOKEN") {
            self.sanity.token = Some(token);
        }
        if let Some(project) = get("SANITY_PROJECT_ID") {
            self.sanity.project_id = project;
        }
        if let Some(dataset) = get("SANITY_DATASET") {
            self.sanity.dataset = dataset;
        }
    }
}

/// Site-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub url: String,
    /// Language of user-facing messages
    pub language: Lang,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            url: "http://localhost:3000".to_string(),
            language: Lang::Fr,
        }
    }
}

/// Chat-completions endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            max_tokens: 3000,
            temperature: 0.7,
            top_p: 0.9,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Sanity project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Overrides `https://<project_id>.api.sanity.io`
    pub api_host: Option<String>,
}

impl SanityConfig {
    /// Base URL of the project's HTTP API, without a trailing slash
    pub fn api_base(&self) -> String {
        match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.sanity.io", self.project_id),
        }
    }
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
            timeout_secs: 30,
            api_host: None,
        }
    }
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}
