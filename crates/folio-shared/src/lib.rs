//! # Folio Shared
//!
//! Shared types between frontend and backend.
//! Every response body carries a `success` flag so the admin UI can branch
//! on it before looking at anything else.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse, PostListResponse, PostResponse, StatsResponse};
