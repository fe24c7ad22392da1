//! # Folio Core
//!
//! The domain layer of the Folio blog service.
//! This crate contains the post model, payload sanitisation and the ports
//! infrastructure must implement. It performs no I/O.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{RepoError, ValidationErrors};
