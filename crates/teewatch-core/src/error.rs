//! Core error types for teewatch-core.
//!
//! Each stage of a poll cycle owns one error kind. [`WatchError`] unifies
//! them and knows which ones must stop the process.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the watch process.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Login flow did not yield a usable session
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Tee-sheet data could not be retrieved
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A single slot record could not be evaluated
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// A notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl WatchError {
    /// Whether this error must terminate the watch process.
    ///
    /// Fetch failures only abort the current tick; evaluation failures never
    /// leave a tick at all.
    pub fn is_fatal(&self) -> bool {
        match self {
            WatchError::Authentication(_) | WatchError::Notification(_) | WatchError::Config(_) => {
                true
            }
            WatchError::Fetch(_) | WatchError::Evaluation(_) => false,
        }
    }
}

/// Login flow errors. Never retried.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Transport failure talking to the login page
    #[error("Login request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Login page did not set a session-id cookie
    #[error("Login page did not set a PHPSESSID cookie")]
    MissingSessionId,

    /// Login page did not contain the anti-forgery token
    #[error("Login form token '{field}' not found in login page")]
    MissingFormToken { field: String },

    /// Credential submission did not return any cookies
    #[error("Credential submission returned no session cookies (HTTP {status})")]
    MissingSessionCookies { status: u16 },

    /// Login endpoint answered with an unexpected status
    #[error("Login endpoint returned HTTP {status}")]
    UnexpectedStatus { status: u16 },
}

/// Errors retrieving one day of tee-sheet data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure
    #[error("Tee-sheet request for {date} failed: {source}")]
    Network {
        date: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status other than a session rejection
    #[error("Tee-sheet for {date} returned HTTP {status}")]
    Status { date: String, status: u16 },

    /// Site bounced the request back to login; the session must be renewed
    #[error("Session rejected while fetching {date} (HTTP {status})")]
    SessionRejected { date: String, status: u16 },

    /// Body was not a tee-sheet document at all
    #[error("Tee-sheet for {date} is not valid JSON: {source}")]
    Decode {
        date: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP client could not be constructed
    #[error("Failed to build tee-sheet client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A single (date, time) record could not be judged.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Watched time is absent from the day's tee sheet
    #[error("No slot data for {date} {time}")]
    MissingSlot { date: String, time: String },

    /// Record present but does not match the slot schema
    #[error("Malformed slot data for {date} {time}: {message}")]
    Malformed {
        date: String,
        time: String,
        message: String,
    },
}

/// Notification delivery errors. Always fatal.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Transport failure
    #[error("Notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider refused the message
    #[error("Notification provider rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Send task panicked or was cancelled
    #[error("Notification task did not complete: {0}")]
    Aborted(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

impl From<tokio::task::JoinError> for NotificationError {
    fn from(err: tokio::task::JoinError) -> Self {
        NotificationError::Aborted(err.to_string())
    }
}

/// Result type alias for WatchError
pub type Result<T, E = WatchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_evaluation_errors_are_recoverable() {
        let fetch = WatchError::from(FetchError::Status {
            date: "2022/10/15".into(),
            status: 503,
        });
        assert!(!fetch.is_fatal());

        let eval = WatchError::from(EvaluationError::MissingSlot {
            date: "2022/10/15".into(),
            time: "13:10".into(),
        });
        assert!(!eval.is_fatal());
    }

    #[test]
    fn auth_and_notification_errors_are_fatal() {
        assert!(WatchError::from(AuthError::MissingSessionId).is_fatal());
        assert!(WatchError::from(NotificationError::Rejected {
            status: 401,
            body: "Forbidden".into(),
        })
        .is_fatal());
    }

    #[test]
    fn error_messages_name_the_slot() {
        let err = EvaluationError::Malformed {
            date: "2022/10/15".into(),
            time: "13:20".into(),
            message: "missing field `bookable`".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed slot data for 2022/10/15 13:20: missing field `bookable`"
        );
    }
}
