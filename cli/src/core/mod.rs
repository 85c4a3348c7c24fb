//! # LookAroun Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every command:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use lookaroun::core::config; // For loading configuration
//! use lookaroun::core::error::{LookarounError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
