//! The module contains the errors the core can throw.
//!
//! The taxonomy follows the operation boundaries:
//!
//! - [`Auth`] invalid credentials or an expired session; the caller must
//!   force a logout.
//! - [`Validation`] client-detectable bad input, rejected before any
//!   network call.
//! - [`Network`] / [`Server`] transient failures surfaced as retryable
//!   messages, never applied to local state.
//! - [`NotFound`] the referenced entity vanished server-side.
//!
//! [`Auth`]: CoreError::Auth
//! [`Validation`]: CoreError::Validation
//! [`Network`]: CoreError::Network
//! [`Server`]: CoreError::Server
//! [`NotFound`]: CoreError::NotFound
use thiserror::Error;

/// Core custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
}
