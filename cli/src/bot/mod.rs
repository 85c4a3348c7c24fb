//! # LookAroun Assistant Logic
//!
//! File: cli/src/bot/mod.rs
//!
//! ## Overview
//!
//! Everything that decides what the assistant says, independent of how the
//! conversation is displayed:
//!
//! - `knowledge`: Ordered starter and knowledge tables, built-in or from a file
//! - `matcher`: The response matcher (canonical and legacy rules)
//! - `session`: Per-conversation transcripts and the session registry
//! - `generator`: Conversational model used by the legacy strategy
//! - `assistant`: Ties the above together for the front-ends
//!
//! ## Usage
//!
//! ```rust
//! use lookaroun::bot::assistant::Assistant;
//! use lookaroun::core::config::Config;
//!
//! let assistant = Assistant::from_config(&Config::default()).unwrap();
//! let answer = assistant.respond("What is LookAroun?");
//! assert!(answer.starts_with("LookAroun is"));
//! ```
//!
pub mod assistant;
pub mod generator;
pub mod knowledge;
pub mod matcher;
pub mod session;
