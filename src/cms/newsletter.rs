//! Newsletter subscriptions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::contact::is_valid_email;
use super::SanityClient;
use crate::error::{InputError, Result};

/// A subscription as stored in the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub email: String,
    pub source: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Result of a signup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed { id: String },
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubscribeOutcome::Subscribed { .. })
    }

    /// Message catalog key for the visitor
    pub fn message_key(&self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed { .. } => "newsletter.success",
            SubscribeOutcome::AlreadySubscribed => "newsletter.already_subscribed",
        }
    }
}

/// Normalize and check an address
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(InputError::EmailRequired.into());
    }
    if !is_valid_email(&email) {
        return Err(InputError::InvalidEmail.into());
    }
    Ok(email)
}

/// Subscribe an address unless it already has an active subscription
pub async fn subscribe(
    client: &SanityClient,
    email: &str,
    source: &str,
    now: DateTime<Utc>,
) -> Result<SubscribeOutcome> {
    let email = normalize_email(email)?;

    let existing: Option<String> = client
        .query(
            r#"*[_type == "newsletter" && email == $email && isActive == true][0]._id"#,
            &[("email", json!(email))],
        )
        .await?;
    if existing.is_some() {
        tracing::debug!("{} is already subscribed", email);
        return Ok(SubscribeOutcome::AlreadySubscribed);
    }

    let subscription = Subscription {
        doc_type: "newsletter".to_string(),
        email,
        source: source.to_string(),
        subscribed_at: now,
        is_active: true,
    };
    let id = client.create(&subscription).await?;
    tracing::info!("New newsletter subscriber {}", subscription.email);

    Ok(SubscribeOutcome::Subscribed { id })
}
