use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(tor_reminder::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tor_reminder::config))]
    Config(String),

    #[error("Credentials error: {0}")]
    #[diagnostic(
        code(tor_reminder::credentials),
        help("Run `get_calendar_token` or place a service account key at GOOGLE_CREDENTIALS_FILE")
    )]
    Credentials(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(tor_reminder::google_calendar))]
    GoogleCalendar(String),

    #[error("Webhook error: {0}")]
    #[diagnostic(code(tor_reminder::webhook))]
    Webhook(String),

    #[error(transparent)]
    #[diagnostic(code(tor_reminder::io))]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(tor_reminder::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(tor_reminder::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(tor_reminder::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ReminderResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create credentials errors
pub fn credentials_error(message: &str) -> Error {
    Error::Credentials(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create webhook errors
pub fn webhook_error(message: &str) -> Error {
    Error::Webhook(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
