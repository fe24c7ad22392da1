//! Domain-level error types.

use thiserror::Error;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Stored data could not be (de)serialized: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Slug '{0}' is already in use")]
    SlugTaken(String),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        RepoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Serialization(err.to_string())
    }
}

/// Every constraint a post payload violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}
