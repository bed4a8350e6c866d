//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PharmaClock
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PharmaClockError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backing table or endpoint for an optional feature does not exist
    /// in this deployment.
    #[error("Feature unavailable: {0}")]
    FeatureUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PharmaClockError {
    /// Whether this error reports a missing optional feature
    pub fn is_feature_unavailable(&self) -> bool {
        matches!(self, Self::FeatureUnavailable(_))
    }

    /// The message without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::Database(m)
            | Self::Config(m)
            | Self::Network(m)
            | Self::Auth(m)
            | Self::NotFound(m)
            | Self::InvalidInput(m)
            | Self::FeatureUnavailable(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Result type alias for PharmaClock operations
pub type Result<T> = std::result::Result<T, PharmaClockError>;
