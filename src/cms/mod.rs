//! Sanity CMS client and documents

pub mod contact;
pub mod newsletter;
pub mod posts;
pub mod taxonomy;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

use crate::config::SanityConfig;
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Deserialize)]
struct MutationResult {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Handle on one Sanity dataset
pub struct SanityClient {
    http: Client,
    base_url: String,
    api_version: String,
    dataset: String,
    token: Option<String>,
}

impl fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanityClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("dataset", &self.dataset)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SanityClient {
    pub fn new(config: &SanityConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() && config.api_host.is_none() {
            return Err(Error::Config("Sanity project id not configured".to_string()));
        }
        if config.dataset.trim().is_empty() {
            return Err(Error::Config("Sanity dataset not configured".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base(),
            api_version: config.api_version.trim_start_matches('v').to_string(),
            dataset: config.dataset.clone(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, kind: &str) -> String {
        format!(
            "{}/v{}/data/{}/{}",
            self.base_url, self.api_version, kind, self.dataset
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Run a batch of mutations and return the affected document ids
    async fn mutate(&self, mutations: Value) -> Result<Vec<String>> {
        let request = self
            .http
            .post(self.endpoint("mutate"))
            .query(&[("returnIds", "true")])
            .json(&json!({ "mutations": mutations }));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::save(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::save(describe_failure(status, &body)));
        }

        let response: MutationResponse = response
            .json()
            .await
            .map_err(|e| Error::save(format!("unexpected mutation response: {}", e)))?;

        Ok(response.results.into_iter().map(|r| r.id).collect())
    }

    /// Create a document and return its id
    pub async fn create<T: Serialize>(&self, document: &T) -> Result<String> {
        let ids = self.mutate(json!([{ "create": document }])).await?;
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| Error::save("no document id returned"))?;
        tracing::info!("Created document {}", id);
        Ok(id)
    }

    /// Set fields on an existing document
    pub async fn patch_set<T: Serialize>(&self, id: &str, fields: &T) -> Result<()> {
        self.mutate(json!([{ "patch": { "id": id, "set": fields } }]))
            .await?;
        tracing::info!("Patched document {}", id);
        Ok(())
    }

    /// Run a GROQ query with `$name` parameters
    pub async fn query<T: DeserializeOwned>(&self, groq: &str, params: &[(&str, Value)]) -> Result<T> {
        let mut query: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
        for (name, value) in params {
            query.push((format!("${}", name), value.to_string()));
        }
        tracing::debug!("GROQ query: {} params={:?}", groq, params);

        let request = self.http.get(self.endpoint("query")).query(&query);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::Query(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Query(describe_failure(status, &body)));
        }

        let response: QueryResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::Query(format!("unexpected query response: {}", e)))?;
        Ok(response.result)
    }
}

/// Read a JSON `null` as the type's default; pair with `#[serde(default)]`
/// so missing fields are covered as well
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Word a failed response so that save failures classify sensibly
fn describe_failure(status: StatusCode, body: &str) -> String {
    let class = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authorization error",
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            "validation error"
        }
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            "network error"
        }
        _ => "request failed",
    };
    format!("{} (HTTP {}): {}", class, status.as_u16(), body)
}
