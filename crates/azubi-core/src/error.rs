//! Error types for the azubiheft client.

use chrono::NaiveDate;
use thiserror::Error;

/// A shared error type for every azubiheft crate.
///
/// Precondition and validation variants are raised locally before any
/// network round trip. Everything else describes a failed interaction with
/// the site or with the local environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AzubiError {
    /// Credentials were rejected or the post-login probe still shows a
    /// logged-out session.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// `login` was called while a live session exists.
    #[error("Already logged in, logout first")]
    AlreadyAuthenticated,

    /// An operation requiring a session was called without one.
    #[error("Not logged in, login first")]
    NotAuthenticated,

    /// A hidden form-state field is absent from the fetched page.
    #[error("Missing form token '{field}' (page layout changed or unexpected page)")]
    MissingToken { field: &'static str },

    /// An element the scraper relies on is absent from the fetched page.
    #[error("Missing element '{element}' on {page} page")]
    MissingMarkup {
        page: &'static str,
        element: &'static str,
    },

    /// No weekly report container matches the requested date.
    #[error("No report week found for {date} (calendar week {week}/{year})")]
    WeekNotFound {
        date: NaiveDate,
        week: u32,
        year: i32,
    },

    /// Caller input rejected before anything was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The HTTP layer failed (connection, TLS, body decoding).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The site answered with a non-success status.
    #[error("Unexpected HTTP status {status} while {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AzubiError {
    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an UnexpectedStatus error
    pub fn unexpected_status(status: u16, context: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            context: context.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_week_not_found(&self) -> bool {
        matches!(self, Self::WeekNotFound { .. })
    }

    /// True when the page did not look like the one the scraper expected.
    ///
    /// This usually means the site layout changed or the session silently
    /// expired and the server answered with its login page instead.
    pub fn is_layout_mismatch(&self) -> bool {
        matches!(self, Self::MissingToken { .. } | Self::MissingMarkup { .. })
    }
}

impl From<std::io::Error> for AzubiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for AzubiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid TOML: {}", err))
    }
}

/// A type alias for `Result<T, AzubiError>`.
pub type Result<T> = std::result::Result<T, AzubiError>;
