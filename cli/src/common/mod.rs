//! # LookAroun Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to one command. Command handlers
//! import what they need directly from the submodule:
//!
//! ```rust
//! use lookaroun::common::network;
//! ```
//!
//! - **`network`**: Port probing and local IP detection for the chat server.
//!

/// Utilities related to network operations (IP detection, port probing).
pub mod network;
