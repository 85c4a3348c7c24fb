//! # LookAroun Assistant Library
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! Library half of the `lookaroun` crate. The binary in `main.rs` only parses
//! arguments, sets up logging and dispatches to `commands`; everything else
//! lives here so it can be tested directly:
//!
//! - `bot`: Matching, knowledge tables, sessions and the conversational generator
//! - `commands`: Handlers for `serve`, `chat`, `ask` and `kb`
//! - `common`: Shared helpers (network discovery)
//! - `core`: Configuration and error types
//!
pub mod bot;
pub mod commands;
pub mod common;
pub mod core;
