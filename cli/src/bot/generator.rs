//! # Conversational Generator
//!
//! File: cli/src/bot/generator.rs
//!
//! ## Overview
//!
//! The legacy strategy hands questions the knowledge tables cannot answer to a
//! general-purpose conversational model. This module defines:
//! - `ReplyGenerator`: the seam to such a model
//! - `GenerationOutcome`: the typed result of one generation, so a failed
//!   turn is an ordinary value rather than an error
//! - `HttpGenerator`: a generator served over HTTP
//! - `LazyGenerator`: the process-wide slot that builds the generator once,
//!   on first use
//!
//! ## Wire format
//!
//! `HttpGenerator` POSTs JSON and expects a JSON reply:
//!
//! ```text
//! > { "input": "...", "past_user_inputs": [...], "generated_responses": [...] }
//! < { "reply": "..." }
//! ```
//!
use crate::bot::session::ConversationContext;
use crate::core::config::GeneratorSection;
use crate::core::error::{LookarounError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Result of asking the generator for one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed(String),
}

/// A conversational model that can continue a conversation.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, context: &ConversationContext, input: &str) -> GenerationOutcome;
}

/// Generator reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    input: &'a str,
    past_user_inputs: &'a [String],
    generated_responses: &'a [String],
}

#[derive(Deserialize)]
struct GenerateResponse {
    reply: String,
}

impl HttpGenerator {
    /// Builds a client for `endpoint`. No request is sent until the first generation.
    pub fn connect(endpoint: &str, timeout: Duration) -> std::result::Result<Self, String> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| format!("invalid generator endpoint '{}': {}", endpoint, e))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ReplyGenerator for HttpGenerator {
    async fn generate(&self, context: &ConversationContext, input: &str) -> GenerationOutcome {
        let body = GenerateRequest {
            input,
            past_user_inputs: &context.past_user_inputs,
            generated_responses: &context.generated_responses,
        };
        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return GenerationOutcome::Failed(format!("request failed: {}", e)),
        };
        let status = response.status();
        if !status.is_success() {
            return GenerationOutcome::Failed(format!("generator returned {}", status));
        }
        match response.json::<GenerateResponse>().await {
            Ok(parsed) => GenerationOutcome::Generated(parsed.reply),
            Err(e) => GenerationOutcome::Failed(format!("malformed generator response: {}", e)),
        }
    }
}

type Loader =
    Box<dyn Fn() -> std::result::Result<Arc<dyn ReplyGenerator>, String> + Send + Sync>;

/// Builds the generator on first use and hands out the same instance afterwards.
///
/// Concurrent first callers wait for a single initialisation. A failed
/// initialisation is not remembered: the next call tries again.
pub struct LazyGenerator {
    cell: OnceCell<Arc<dyn ReplyGenerator>>,
    loader: Loader,
}

impl LazyGenerator {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> std::result::Result<Arc<dyn ReplyGenerator>, String> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            loader: Box::new(loader),
        }
    }

    /// Slot for the HTTP generator described by the `[generator]` config section.
    pub fn from_settings(settings: &GeneratorSection) -> Self {
        let endpoint = settings.endpoint.clone();
        let timeout = Duration::from_secs(settings.timeout_secs);
        Self::new(move || match &endpoint {
            Some(endpoint) => HttpGenerator::connect(endpoint, timeout)
                .map(|generator| Arc::new(generator) as Arc<dyn ReplyGenerator>),
            None => Err("no generator endpoint configured".to_string()),
        })
    }

    /// Returns the generator, building it if this is the first call.
    pub async fn get(&self) -> Result<Arc<dyn ReplyGenerator>> {
        let generator = self
            .cell
            .get_or_try_init(|| async {
                info!("Initializing conversational generator");
                (self.loader)()
            })
            .await
            .map_err(|reason| {
                warn!("Conversational generator failed to initialize: {}", reason);
                LookarounError::GeneratorUnavailable { reason }
            })?;
        debug!("Conversational generator ready");
        Ok(Arc::clone(generator))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for LazyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyGenerator")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl ReplyGenerator for FixedGenerator {
        async fn generate(&self, _context: &ConversationContext, _input: &str) -> GenerationOutcome {
            GenerationOutcome::Generated(self.0.to_string())
        }
    }

    async fn spawn_server(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/generate", addr)
    }

    #[tokio::test]
    async fn lazy_generator_initializes_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let slot = Arc::new(LazyGenerator::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedGenerator("hi")) as Arc<dyn ReplyGenerator>)
        }));
        assert!(!slot.is_initialized());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let slot = Arc::clone(&slot);
            handles.push(tokio::spawn(async move { slot.get().await.is_ok() }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(slot.is_initialized());
    }

    #[tokio::test]
    async fn lazy_generator_retries_after_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let slot = LazyGenerator::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("model download failed".to_string())
            } else {
                Ok(Arc::new(FixedGenerator("ok")) as Arc<dyn ReplyGenerator>)
            }
        });

        let err = slot.get().await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<LookarounError>(),
            Some(LookarounError::GeneratorUnavailable { reason }) if reason == "model download failed"
        ));
        assert!(!slot.is_initialized());

        assert!(slot.get().await.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn from_settings_without_endpoint_is_unavailable() {
        let slot = LazyGenerator::from_settings(&GeneratorSection::default());
        let err = slot.get().await.err().unwrap();
        assert!(err.to_string().contains("no generator endpoint configured"));
    }

    #[test]
    fn connect_rejects_invalid_url() {
        let result = HttpGenerator::connect("not a url", Duration::from_secs(1));
        assert!(result.unwrap_err().contains("invalid generator endpoint"));
    }

    #[tokio::test]
    async fn http_generator_sends_context_and_reads_reply() {
        let app = Router::new().route(
            "/generate",
            post(|Json(body): Json<serde_json::Value>| async move {
                let turns = body["past_user_inputs"].as_array().map_or(0, |a| a.len());
                Json(serde_json::json!({
                    "reply": format!("echo {} after {} turns", body["input"].as_str().unwrap_or(""), turns)
                }))
            }),
        );
        let endpoint = spawn_server(app).await;
        let generator = HttpGenerator::connect(&endpoint, Duration::from_secs(5)).unwrap();

        let mut context = ConversationContext::default();
        context.push("earlier", "reply");
        let outcome = generator.generate(&context, "hello").await;

        assert_eq!(
            outcome,
            GenerationOutcome::Generated("echo hello after 1 turns".to_string())
        );
    }

    #[tokio::test]
    async fn http_generator_reports_error_status() {
        let app = Router::new().route(
            "/generate",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let endpoint = spawn_server(app).await;
        let generator = HttpGenerator::connect(&endpoint, Duration::from_secs(5)).unwrap();

        let outcome = generator
            .generate(&ConversationContext::default(), "hello")
            .await;
        assert!(matches!(outcome, GenerationOutcome::Failed(reason) if reason.contains("500")));
    }

    #[tokio::test]
    async fn http_generator_reports_malformed_body() {
        let app = Router::new().route("/generate", post(|| async { "not json" }));
        let endpoint = spawn_server(app).await;
        let generator = HttpGenerator::connect(&endpoint, Duration::from_secs(5)).unwrap();

        let outcome = generator
            .generate(&ConversationContext::default(), "hello")
            .await;
        assert!(matches!(outcome, GenerationOutcome::Failed(reason) if reason.contains("malformed")));
    }
}
