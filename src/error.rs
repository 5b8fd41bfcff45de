//! Error types

use std::fmt;

/// Best-effort classification of a CMS write failure.
///
/// Derived from the error message text only, so it is good enough to pick a
/// user-facing hint and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailureKind {
    Authorization,
    Validation,
    Network,
    Other,
}

impl SaveFailureKind {
    /// Classify a failure by looking for well-known words in its message
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("authorization") {
            Self::Authorization
        } else if message.contains("validation") {
            Self::Validation
        } else if message.contains("network") {
            Self::Network
        } else {
            Self::Other
        }
    }

    /// Message catalog key of the hint shown for this kind of failure
    pub fn hint_key(&self) -> &'static str {
        match self {
            Self::Authorization => "save.authorization",
            Self::Validation => "save.validation",
            Self::Network => "save.network",
            Self::Other => "save.failed",
        }
    }
}

impl fmt::Display for SaveFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Client input that was rejected before reaching any backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("a title is required")]
    TitleRequired,

    #[error("cannot derive a slug from title {0:?}")]
    EmptySlug(String),

    #[error("all fields are required")]
    MissingFields,

    #[error("email is required")]
    EmailRequired,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("message ID is required")]
    MissingId,

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("page size must be between 1 and {max}")]
    PageSizeOutOfRange { max: usize },
}

impl InputError {
    /// Message catalog key shown to end users
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::TitleRequired => "generate.title_required",
            Self::EmptySlug(_) => "save.validation",
            Self::MissingFields => "contact.required",
            Self::EmailRequired => "newsletter.email_required",
            Self::InvalidEmail => "contact.invalid_email",
            Self::MissingId => "contact.id_required",
            Self::NotFound(_) => "contact.update_failed",
            Self::InvalidTransition { .. } => "contact.invalid_transition",
            Self::PageSizeOutOfRange { .. } => "query.page_size",
        }
    }
}

/// Errors produced by the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The call to the LLM endpoint did not produce a completion
    #[error("generation failed: {0}")]
    Generation(String),

    /// Writing a document to the CMS failed
    #[error("save failed ({kind}): {message}")]
    Save {
        kind: SaveFailureKind,
        message: String,
    },

    /// Reading from the CMS failed
    #[error("query failed: {0}")]
    Query(String),

    #[error("config error: {0}")]
    Config(String),

    /// Client input was rejected
    #[error(transparent)]
    Validation(#[from] InputError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a save error, classifying it from its message
    pub fn save(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Save {
            kind: SaveFailureKind::classify(&message),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_save_failures() {
        assert_eq!(
            SaveFailureKind::classify("Insufficient permissions; authorization required"),
            SaveFailureKind::Authorization
        );
        assert_eq!(
            SaveFailureKind::classify("Document failed Validation"),
            SaveFailureKind::Validation
        );
        assert_eq!(
            SaveFailureKind::classify("network unreachable"),
            SaveFailureKind::Network
        );
        assert_eq!(SaveFailureKind::classify("boom"), SaveFailureKind::Other);
    }

    #[test]
    fn test_classify_prefers_authorization() {
        let kind = SaveFailureKind::classify("authorization validation network");
        assert_eq!(kind, SaveFailureKind::Authorization);
    }

    #[test]
    fn test_input_error_converts() {
        let err: Error = InputError::InvalidEmail.into();
        assert_eq!(err.to_string(), "invalid email format");
        assert!(matches!(err, Error::Validation(InputError::InvalidEmail)));
        assert_eq!(InputError::MissingId.message_key(), "contact.id_required");
    }

    #[test]
    fn test_save_error_carries_kind() {
        match Error::save("network timeout") {
            Error::Save { kind, message } => {
                assert_eq!(kind, SaveFailureKind::Network);
                assert_eq!(message, "network timeout");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
