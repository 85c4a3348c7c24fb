//! # LookAroun Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the assistant. It
//! follows the same split as the rest of the crate:
//! - `LookarounError`: a `thiserror` enum for failures callers may want to
//!   match on (an unknown session, an unavailable generator, ...)
//! - `Result<T>`: an alias for `anyhow::Result<T>` so that I/O and parse
//!   failures can carry context as they propagate
//!
//! The response matcher itself never fails; everything here concerns the
//! surroundings (configuration, knowledge files, sessions, the generator).
//!
//! ## Examples
//!
//! ```rust
//! use anyhow::Context;
//! use lookaroun::core::error::{LookarounError, Result};
//!
//! fn load(path: &std::path::Path) -> Result<String> {
//!     if !path.exists() {
//!         return Err(LookarounError::Knowledge(format!(
//!             "Knowledge file not found: {}",
//!             path.display()
//!         ))
//!         .into());
//!     }
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read {}", path.display()))
//! }
//! ```
//!
//! The HTTP layer downcasts to `LookarounError` to choose a status code.
//!
use thiserror::Error;
use uuid::Uuid;

/// Custom error type for the LookAroun assistant.
#[derive(Error, Debug)]
pub enum LookarounError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Session '{id}' not found.")]
    SessionNotFound { id: Uuid },

    #[error("Conversational model unavailable: {reason}")]
    GeneratorUnavailable { reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
