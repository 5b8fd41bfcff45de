//! OpenAI-compatible chat-completions client (Groq by default)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::GenerationRequest;
use crate::config::LlmConfig;
use crate::content::{extract_article, GeneratedArticle};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for the chat-completions endpoint
pub struct GroqClient {
    http: Client,
    config: LlmConfig,
    api_key: String,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GroqClient {
    /// Build a client; fails when no API key is configured
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("GROQ API key not configured".to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            api_key,
        })
    }

    /// Send messages and return the text of the first choice.
    ///
    /// A response without choices yields an empty string, not an error.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("HTTP {}: {}", status, body)));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Invalid completion response: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        let preview: String = content.chars().take(200).collect();
        tracing::debug!("Generated content: {}...", preview);

        Ok(content)
    }

    /// Ask the model for an article and parse its labeled sections
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArticle> {
        request.validate()?;
        tracing::info!(
            "Generating {} article: {}",
            request.article_type,
            request.title.trim()
        );

        let completion = self.complete(&request.messages()).await?;
        let article = extract_article(&completion);
        if article.is_sparse() {
            tracing::warn!("Completion contained no labeled sections");
        }

        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            base_url: base_url.to_string(),
            api_key: Some("gsk_test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        let err = GroqClient::new(&LlmConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "config error: GROQ API key not configured");

        let client = GroqClient::new(&config("http://localhost")).unwrap();
        assert!(!format!("{:?}", client).contains("gsk_test"));
    }

    #[tokio::test]
    async fn test_generate_parses_completion() {
        let server = MockServer::start().await;
        let completion = "META_DESCRIPTION: Desc\n\nSLUG: rust-guide\n\nKEYWORDS: rust, tokio\n\nEXCERPT: Court.\n\nCONTENT:\n# Rust\n\nIntro.";
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_partial_json(json!({
                "model": "llama3-70b-8192",
                "max_tokens": 3000,
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": completion } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server.uri())).unwrap();
        let article = client.generate(&GenerationRequest::new("Rust")).await.unwrap();
        assert_eq!(article.slug, "rust-guide");
        assert_eq!(article.keywords, vec!["rust", "tokio"]);
        assert_eq!(article.content, "# Rust\n\nIntro.");
    }

    #[tokio::test]
    async fn test_empty_choices_is_sparse_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server.uri())).unwrap();
        let article = client.generate(&GenerationRequest::new("Rust")).await.unwrap();
        assert!(article.is_sparse());
    }

    #[tokio::test]
    async fn test_http_failure_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server.uri())).unwrap();
        let err = client
            .generate(&GenerationRequest::new("Rust"))
            .await
            .unwrap_err();
        match err {
            Error::Generation(message) => assert!(message.contains("rate limited")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_title_never_calls_the_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GroqClient::new(&config(&server.uri())).unwrap();
        let err = client.generate(&GenerationRequest::new(" ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
