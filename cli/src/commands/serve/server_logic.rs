//! # Chat Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! Starts the Axum server behind `lookaroun serve`:
//! 1. Find a bindable address (only the requested port unless
//!    `port_attempts` allows stepping to the next ones)
//! 2. Build the router with tracing and CORS middleware
//! 3. Print the connection banner
//! 4. Sweep idle sessions in the background
//! 5. Serve until Ctrl+C or SIGTERM, then shut down gracefully
//!
use super::config::ServerConfig;
use super::handlers::{self, AppState};
use crate::bot::session::SessionStore;
use crate::common::network::{find_available_port, local_ip};
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use chrono::TimeDelta;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, Level};

/// Longest wait between two idle-session sweeps.
const MAX_SWEEP_INTERVAL_SECS: u64 = 60;

/// # Run Chat Server (`run_server`)
///
/// Binds the configured address and serves the chat page and API until a
/// shutdown signal arrives.
///
/// ## Errors
///
/// Returns an error if no port could be bound within `port_attempts`, or if
/// the server fails while running.
pub async fn run_server(config: ServerConfig, state: AppState) -> Result<()> {
    let addr = find_available_port(config.host, config.port, config.port_attempts).await?;
    let strategy = state.assistant.strategy();
    let sweeper = spawn_session_sweeper(Arc::clone(&state.sessions), config.session_ttl_secs);
    let app = create_app(&config, state);

    println!("\n=================================================================");
    println!("💬 LookAroun Assistant");
    println!("🌐 Local URL:         http://localhost:{}", addr.port());
    if !config.host.is_loopback() {
        if let Some(ip) = local_ip().await {
            println!("🔗 Network URL:       http://{}:{}", ip, addr.port());
        }
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("🧠 Matching strategy: {:?}", strategy);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("⏱️  Session idle limit: {}s", config.session_ttl_secs);
    println!("=================================================================\n");

    info!("Starting chat server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    sweeper.abort();

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Periodically drops sessions idle for longer than `ttl_secs`.
fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl_secs: u64) -> JoinHandle<()> {
    let ttl = TimeDelta::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX / 1000));
    let period = Duration::from_secs(ttl_secs.clamp(1, MAX_SWEEP_INTERVAL_SECS));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = sessions.prune_idle(ttl).await;
            if removed > 0 {
                info!("Expired {} idle session(s)", removed);
            } else {
                debug!("No idle sessions to expire");
            }
        }
    })
}

/// Completes on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Create Axum Application (`create_app`)
///
/// Wraps the chat router in request tracing and, unless disabled, a
/// permissive CORS layer.
pub fn create_app(config: &ServerConfig, state: AppState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    handlers::router(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}
