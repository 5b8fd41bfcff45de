//! HTTP API for the blog front end and the admin writer

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cms::contact::{self, ContactForm, ContactQuery, ContactStatus, ContactUpdate};
use crate::cms::{newsletter, SanityClient};
use crate::content::{GeneratedArticle, PostDocument};
use crate::error::Error;
use crate::i18n::I18n;
use crate::llm::{ArticleType, GenerationRequest, GroqClient};
use crate::BlogWriter;

/// Shared handler state; clients are built once at startup
pub struct AppState {
    /// Absent when no API key is configured
    pub llm: Option<GroqClient>,
    pub cms: SanityClient,
    pub i18n: I18n,
}

impl AppState {
    pub fn from_writer(writer: &BlogWriter) -> Result<Self> {
        let llm = match writer.llm_client() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Content generation disabled: {}", e);
                None
            }
        };

        Ok(Self {
            llm,
            cms: writer.cms_client()?,
            i18n: writer.i18n()?,
        })
    }
}

/// JSON error reply
struct ApiError {
    status: StatusCode,
    body: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl AppState {
    /// Map a library error to a localized reply; `fallback` names the generic message
    fn error(&self, err: Error, fallback: &str) -> ApiError {
        match err {
            Error::Validation(input) => ApiError {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "error": self.i18n.get(input.message_key()) }),
            },
            Error::Save { kind, message } => {
                tracing::error!("Save failed ({}): {}", kind, message);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({
                        "error": self.i18n.get("save.failed"),
                        "hint": self.i18n.get(kind.hint_key()),
                    }),
                }
            }
            other => {
                tracing::error!("{}: {}", fallback, other);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "error": self.i18n.get(fallback) }),
                }
            }
        }
    }
}

type SharedState = Arc<AppState>;

/// Build the API router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/generate-content", post(generate_content))
        .route("/api/posts", post(create_post))
        .route(
            "/api/contact",
            post(submit_contact).get(list_contacts).patch(update_contact),
        )
        .route("/api/newsletter", post(subscribe_newsletter))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(writer: &BlogWriter, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_writer(writer)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("API running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentBody {
    title: String,
    prompt: Option<String>,
    #[serde(rename = "type")]
    article_type: Option<String>,
    keywords: Option<String>,
}

async fn generate_content(
    State(state): State<SharedState>,
    Json(body): Json<GenerateContentBody>,
) -> Result<Json<GeneratedArticle>, ApiError> {
    tracing::debug!("Received generation request: {:?}", body);

    let article_type = body
        .article_type
        .as_deref()
        .and_then(|t| t.parse::<ArticleType>().ok())
        .unwrap_or_default();
    let request = GenerationRequest {
        title: body.title,
        prompt: body.prompt,
        article_type,
        keywords: body.keywords,
    };
    request
        .validate()
        .map_err(|e| state.error(e, "generate.failed"))?;

    let Some(llm) = state.llm.as_ref() else {
        return Err(state.error(
            Error::Config("GROQ API key not configured".to_string()),
            "generate.failed",
        ));
    };

    let article = llm
        .generate(&request)
        .await
        .map_err(|e| state.error(e, "generate.failed"))?;
    Ok(Json(article))
}

#[derive(Debug, Deserialize)]
struct CreatePostBody {
    title: String,
    article: GeneratedArticle,
}

async fn create_post(
    State(state): State<SharedState>,
    Json(body): Json<CreatePostBody>,
) -> Result<impl IntoResponse, ApiError> {
    let post = PostDocument::from_generated(&body.title, &body.article, Utc::now())
        .map_err(|e| state.error(e, "save.failed"))?;
    for warning in post.seo_warnings() {
        tracing::warn!("{}: {}", post.slug.current, warning);
    }

    let id = state
        .cms
        .create(&post)
        .await
        .map_err(|e| state.error(e, "save.failed"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "slug": post.slug.current,
            "message": state.i18n.get("save.success"),
        })),
    ))
}

async fn submit_contact(
    State(state): State<SharedState>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    let id = contact::submit(&state.cms, form, Utc::now())
        .await
        .map_err(|e| state.error(e, "contact.failed"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": state.i18n.get("contact.success"),
            "id": id,
        })),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListContactsParams {
    status: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn list_contacts(
    State(state): State<SharedState>,
    Query(params): Query<ListContactsParams>,
) -> Result<Json<Value>, ApiError> {
    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<ContactStatus>().map_err(|e| ApiError {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": e }),
        })?),
        None => None,
    };

    let query = ContactQuery::new(
        status,
        params.limit.unwrap_or(contact::DEFAULT_LIMIT),
        params.offset.unwrap_or(0),
    )
    .map_err(|e| state.error(e, "contact.fetch_failed"))?;

    let messages = contact::list(&state.cms, &query)
        .await
        .map_err(|e| state.error(e, "contact.fetch_failed"))?;
    Ok(Json(json!({ "messages": messages })))
}

async fn update_contact(
    State(state): State<SharedState>,
    Json(update): Json<ContactUpdate>,
) -> Result<Json<Value>, ApiError> {
    contact::update(&state.cms, &update)
        .await
        .map_err(|e| state.error(e, "contact.update_failed"))?;

    Ok(Json(json!({
        "success": true,
        "message": state.i18n.get("contact.updated"),
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsletterBody {
    email: String,
}

async fn subscribe_newsletter(
    State(state): State<SharedState>,
    Json(body): Json<NewsletterBody>,
) -> Response {
    match newsletter::subscribe(&state.cms, &body.email, "website", Utc::now()).await {
        Ok(outcome) => {
            let status = if outcome.is_success() {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            };
            let body = json!({
                "success": outcome.is_success(),
                "message": state.i18n.get(outcome.message_key()),
            });
            (status, Json(body)).into_response()
        }
        Err(Error::Validation(input)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": state.i18n.get(input.message_key()),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Newsletter subscription error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": state.i18n.get("newsletter.failed"),
                })),
            )
                .into_response()
        }
    }
}
