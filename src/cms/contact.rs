//! Contact form messages and their admin workflow

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{null_as_default, SanityClient};
use crate::error::{InputError, Result};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Default page size for the admin listing
pub const DEFAULT_LIMIT: usize = 50;

/// Largest page the admin listing serves
pub const MAX_LIMIT: usize = 100;

/// Loose email syntax check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Where a message is in the admin workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Replied,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in-progress",
            ContactStatus::Replied => "replied",
            ContactStatus::Closed => "closed",
        }
    }

    /// Whether the admin may move a message from `self` to `next`
    pub fn can_transition_to(&self, next: ContactStatus) -> bool {
        use ContactStatus::*;
        match (*self, next) {
            (from, to) if from == to => true,
            (New, InProgress) => true,
            (New | InProgress, Replied) => true,
            (from, Closed) => from != Closed,
            _ => false,
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(ContactStatus::New),
            "in-progress" => Ok(ContactStatus::InProgress),
            "replied" => Ok(ContactStatus::Replied),
            "closed" => Ok(ContactStatus::Closed),
            other => Err(format!("Unknown contact status: {}", other)),
        }
    }
}

/// What a visitor submits
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<()> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(InputError::MissingFields.into());
        }
        if !is_valid_email(self.email.trim()) {
            return Err(InputError::InvalidEmail.into());
        }
        Ok(())
    }

    /// Build the stored document
    pub fn into_document(self, submitted_at: DateTime<Utc>) -> ContactDocument {
        ContactDocument {
            doc_type: "contact".to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            is_read: false,
            submitted_at,
            status: ContactStatus::New,
        }
    }
}

/// A contact message as written to the CMS
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub submitted_at: DateTime<Utc>,
    pub status: ContactStatus,
}

/// A contact message as read back by the admin.
///
/// Documents edited by hand in the studio may lack fields; those read as
/// empty so one bad record never hides the rest of the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ContactStatus,
}

/// Filters for the admin listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    pub status: Option<ContactStatus>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ContactQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ContactQuery {
    /// Checked listing window; `limit` must be within `1..=MAX_LIMIT`
    pub fn new(status: Option<ContactStatus>, limit: usize, offset: usize) -> Result<Self> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(InputError::PageSizeOutOfRange { max: MAX_LIMIT }.into());
        }
        Ok(Self {
            status,
            limit,
            offset,
        })
    }

    /// GROQ text and parameters for this listing
    pub fn to_groq(&self) -> (String, Vec<(&'static str, Value)>) {
        let mut filter = String::from(r#"_type == "contact""#);
        let mut params = vec![
            ("start", json!(self.offset)),
            ("end", json!(self.offset.saturating_add(self.limit))),
        ];
        if let Some(status) = self.status {
            filter.push_str(" && status == $status");
            params.push(("status", json!(status.as_str())));
        }

        let groq = format!(
            "*[{}] | order(submittedAt desc) [$start...$end] {{ _id, name, email, subject, message, isRead, submittedAt, status }}",
            filter
        );
        (groq, params)
    }
}

/// Admin changes to a message; only provided fields are written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactUpdate {
    pub id: String,
    pub is_read: Option<bool>,
    pub status: Option<ContactStatus>,
}

impl ContactUpdate {
    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(is_read) = self.is_read {
            fields.insert("isRead".to_string(), json!(is_read));
        }
        if let Some(status) = self.status {
            fields.insert("status".to_string(), json!(status.as_str()));
        }
        fields
    }
}

/// Store a submitted form and return the new document id
pub async fn submit(client: &SanityClient, form: ContactForm, now: DateTime<Utc>) -> Result<String> {
    form.validate()?;
    let document = form.into_document(now);
    let id = client.create(&document).await?;
    tracing::info!("Contact message {} from {}", id, document.email);
    Ok(id)
}

/// Newest messages first
pub async fn list(client: &SanityClient, query: &ContactQuery) -> Result<Vec<ContactMessage>> {
    let (groq, params) = query.to_groq();
    client.query(&groq, &params).await
}

/// Apply an admin update, enforcing the status workflow
pub async fn update(client: &SanityClient, update: &ContactUpdate) -> Result<()> {
    let id = update.id.trim();
    if id.is_empty() {
        return Err(InputError::MissingId.into());
    }

    if let Some(next) = update.status {
        let current: Option<ContactStatus> = client
            .query(
                r#"*[_type == "contact" && _id == $id][0].status"#,
                &[("id", json!(id))],
            )
            .await?;
        let current = current.ok_or_else(|| InputError::NotFound(id.to_string()))?;
        if !current.can_transition_to(next) {
            return Err(InputError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            }
            .into());
        }
    }

    let fields = update.fields();
    if fields.is_empty() {
        tracing::debug!("Nothing to update on {}", id);
        return Ok(());
    }
    client.patch_set(id, &fields).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::test_support::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> ContactForm {
        ContactForm {
            name: " Ada ".to_string(),
            email: " Ada@Example.COM ".to_string(),
            subject: "Hello".to_string(),
            message: " Hi there \n".to_string(),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }

    #[test]
    fn test_form_validation() {
        assert!(form().validate().is_ok());

        let mut missing = form();
        missing.subject = "  ".to_string();
        assert!(matches!(
            missing.validate(),
            Err(Error::Validation(InputError::MissingFields))
        ));

        let mut bad = form();
        bad.email = "nope".to_string();
        assert!(matches!(
            bad.validate(),
            Err(Error::Validation(InputError::InvalidEmail))
        ));
    }

    #[test]
    fn test_into_document_normalizes_fields() {
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let doc = form().into_document(date);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_type"], "contact");
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["message"], "Hi there");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["status"], "new");
        assert_eq!(json["submittedAt"], "2025-03-01T12:00:00Z");
    }

    #[test]
    fn test_status_transitions() {
        use ContactStatus::*;
        assert!(New.can_transition_to(InProgress));
        assert!(New.can_transition_to(Replied));
        assert!(InProgress.can_transition_to(Replied));
        assert!(Replied.can_transition_to(Closed));
        assert!(New.can_transition_to(New));

        assert!(!InProgress.can_transition_to(New));
        assert!(!Replied.can_transition_to(InProgress));
        assert!(!Closed.can_transition_to(Replied));
        assert!(Closed.can_transition_to(Closed));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in-progress".parse::<ContactStatus>().unwrap(), ContactStatus::InProgress);
        assert!("archived".parse::<ContactStatus>().is_err());
        let json = serde_json::to_string(&ContactStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_listing_query() {
        let (groq, params) = ContactQuery::default().to_groq();
        assert!(groq.starts_with(r#"*[_type == "contact"] | order(submittedAt desc) [$start...$end]"#));
        assert_eq!(params, vec![("start", json!(0)), ("end", json!(50))]);

        let query = ContactQuery {
            status: Some(ContactStatus::Replied),
            limit: 10,
            offset: 20,
        };
        let (groq, params) = query.to_groq();
        assert!(groq.contains("&& status == $status"));
        assert_eq!(params[1], ("end", json!(30)));
        assert_eq!(params[2], ("status", json!("replied")));
    }

    #[test]
    fn test_listing_window_is_checked() {
        let query = ContactQuery::new(None, MAX_LIMIT, 5).unwrap();
        assert_eq!(query.limit, 100);

        for limit in [0, MAX_LIMIT + 1, usize::MAX] {
            assert!(matches!(
                ContactQuery::new(None, limit, 1),
                Err(Error::Validation(InputError::PageSizeOutOfRange { max: 100 }))
            ));
        }
    }

    #[test]
    fn test_listing_end_saturates() {
        let query = ContactQuery {
            status: None,
            limit: usize::MAX,
            offset: 1,
        };
        let (_, params) = query.to_groq();
        assert_eq!(params[1], ("end", json!(usize::MAX)));
    }

    #[test]
    fn test_message_tolerates_missing_fields() {
        let message: ContactMessage = serde_json::from_value(json!({
            "_id": "c1",
            "name": null,
            "email": "a@b.co",
            "message": "M",
            "isRead": null,
            "status": null
        }))
        .unwrap();
        assert_eq!(message.name, "");
        assert_eq!(message.subject, "");
        assert!(!message.is_read);
        assert_eq!(message.status, ContactStatus::New);
        assert!(message.submitted_at.is_none());
    }

    #[tokio::test]
    async fn test_update_checks_workflow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .and(query_param("$id", "\"msg1\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "closed" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(MUTATE_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = update(
            &client,
            &ContactUpdate {
                id: "msg1".to_string(),
                status: Some(ContactStatus::Replied),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(InputError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_patches_given_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MUTATE_PATH))
            .and(body_json(json!({
                "mutations": [{ "patch": { "id": "msg1", "set": { "isRead": true } } }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": "msg1", "operation": "update" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        update(
            &client,
            &ContactUpdate {
                id: "msg1".to_string(),
                is_read: Some(true),
                status: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = update(&client, &ContactUpdate::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(InputError::MissingId)));
    }
}
