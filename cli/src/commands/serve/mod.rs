//! # LookAroun Chat Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `lookaroun serve` hosts the chat page and its JSON API. Every browser tab
//! gets its own session, so transcripts never mix between visitors.
//!
//! The module is organized into three parts:
//! - `config.rs`: arguments and the effective network settings
//! - `handlers.rs`: routes, shared state and the JSON error mapping
//! - `server_logic.rs`: binding, middleware and graceful shutdown
//!
//! ```bash
//! # Default: http://127.0.0.1:8501
//! lookaroun serve
//!
//! # Platform-assigned port, reachable from other machines
//! PORT=8080 lookaroun serve --host 0.0.0.0
//!
//! # Deprecated keyword matcher backed by a generator service
//! lookaroun serve --strategy legacy
//! ```
//!
use super::build_assistant;
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

/// Arguments and effective settings for the chat server.
pub mod config;

/// Routes and handlers of the chat API.
pub mod handlers;

/// The Axum server itself.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Builds the assistant from the layered configuration, resolves the server
/// settings and runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let (config, assistant) = build_assistant(&args.assistant)?;
    let server_config = config::ServerConfig::resolve(&args, &config);
    info!("Effective server config: {:?}", server_config);

    server_logic::run_server(server_config, handlers::AppState::new(assistant)).await
}
