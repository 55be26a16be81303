use std::path::Path;

use thiserror::Error;

/// Unified error type for version synchronization
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Version parsing error: '{input}' {reason}")]
    Parse { input: String, reason: String },

    #[error("'{0}' is not a semver bump type (expected major, minor or patch)")]
    InvalidBumpKind(String),

    #[error("'{0}' is not a platform (expected android, ios or all)")]
    InvalidPlatform(String),

    #[error("Field '{field}' not found in {path}")]
    FieldNotFound { path: String, field: String },

    #[error("Invalid versionCode parsed from {path}: '{value}'")]
    InvalidVersionCode { path: String, value: String },

    #[error("Bump type and semver value not specified")]
    MissingVersionSpec,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in bump-version
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a version parsing error for `input`
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    pub fn field_not_found(path: &Path, field: impl Into<String>) -> Self {
        BumpError::FieldNotFound {
            path: path.display().to_string(),
            field: field.into(),
        }
    }

    pub fn read(path: &Path, source: std::io::Error) -> Self {
        BumpError::Read {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        BumpError::Write {
            path: path.display().to_string(),
            source,
        }
    }
}
