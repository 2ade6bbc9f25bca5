//! Error types for Folio

use thiserror::Error;

/// Result type alias using Folio's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Folio error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project '{0}' not found. Run `folio projects list` to see all projects.")]
    ProjectNotFound(String),

    #[error("Category '{0}' not found. Run `folio categories list` to see all categories.")]
    CategoryNotFound(String),

    #[error("Technology '{0}' not found. Run `folio technologies list` to see all technologies.")]
    TechnologyNotFound(String),

    // Input errors (E100-E199)
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    // Database errors (E200-E299)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Media errors (E300-E399)
    #[error("Media store error: {0}")]
    Media(String),

    // Notification errors (E400-E499)
    #[error("Notification dispatch failed: {0}")]
    Notification(String),

    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    // Config errors (E500-E599)
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a field-level validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::CategoryNotFound(_) => "E002",
            Self::TechnologyNotFound(_) => "E003",
            Self::Validation { .. } => "E100",
            Self::Database(_) => "E200",
            Self::Media(_) => "E300",
            Self::Notification(_) => "E400",
            Self::Network(_) => "E401",
            Self::Config(_) => "E500",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ProjectNotFound(_) => Some("folio projects list".to_string()),
            Self::CategoryNotFound(_) => Some("folio categories list".to_string()),
            Self::TechnologyNotFound(_) => Some("folio technologies list".to_string()),
            Self::Network(_) => Some("Check internet connection".to_string()),
            Self::Config(_) => Some("folio config list".to_string()),
            _ => None,
        }
    }
}
