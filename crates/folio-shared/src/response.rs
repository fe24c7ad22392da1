//! Standardized `{success, ...}` response envelopes.

use serde::{Deserialize, Serialize};

/// List of posts with their count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<T> {
    pub success: bool,
    pub posts: Vec<T>,
    pub count: usize,
}

impl<T> PostListResponse<T> {
    pub fn new(posts: Vec<T>) -> Self {
        Self {
            success: true,
            count: posts.len(),
            posts,
        }
    }
}

/// A single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse<T> {
    pub success: bool,
    pub post: T,
}

impl<T> PostResponse<T> {
    pub fn new(post: T) -> Self {
        Self {
            success: true,
            post,
        }
    }
}

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse<T> {
    pub success: bool,
    pub stats: T,
}

impl<T> StatsResponse<T> {
    pub fn new(stats: T) -> Self {
        Self {
            success: true,
            stats,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error envelope: `{success: false, error, errors?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,

    /// A short, human-readable summary of the problem.
    pub error: String,

    /// Every individual violation, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new("Unauthorized")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn validation(errors: Vec<String>) -> Self {
        Self::new("Validation failed").with_errors(errors)
    }

    pub fn internal_error() -> Self {
        Self::new("Internal Server Error")
    }
}
