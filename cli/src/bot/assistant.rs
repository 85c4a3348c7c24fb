//! # Assistant
//!
//! File: cli/src/bot/assistant.rs
//!
//! ## Overview
//!
//! `Assistant` is what the front-ends (HTTP server, REPL, `ask`) talk to. It
//! owns the read-only knowledge tables and the configured strategy, and turns
//! one user message into one answer:
//!
//! - **canonical**: `matcher::find_best_response`, which never fails
//! - **legacy**: `matcher::find_keyword_response`, then the conversational
//!   generator for anything unmatched. A failed generation becomes the fixed
//!   apology; only an unavailable generator is reported as an error.
//!
//! `Assistant::reply` also records the exchange in the caller's session.
//!
use crate::bot::generator::{GenerationOutcome, LazyGenerator};
use crate::bot::knowledge::KnowledgeBase;
use crate::bot::matcher::{self, MatchStrategy, APOLOGY};
use crate::bot::session::{ConversationContext, Session};
use crate::core::config::Config;
use crate::core::error::Result;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Assistant {
    knowledge: KnowledgeBase,
    strategy: MatchStrategy,
    generator: LazyGenerator,
}

impl Assistant {
    pub fn new(knowledge: KnowledgeBase, strategy: MatchStrategy, generator: LazyGenerator) -> Self {
        Self {
            knowledge,
            strategy,
            generator,
        }
    }

    /// Builds the assistant described by the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge = KnowledgeBase::from_config(config)?;
        let strategy = config.assistant.strategy;
        if strategy == MatchStrategy::Legacy {
            warn!("The legacy matching strategy is deprecated; prefer 'canonical'.");
        }
        info!(
            "Assistant ready: {:?} strategy, {} starters, {} knowledge entries",
            strategy,
            knowledge.starters.len(),
            knowledge.knowledge.len()
        );
        Ok(Self::new(
            knowledge,
            strategy,
            LazyGenerator::from_settings(&config.generator),
        ))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Canonical answer for `input`, independent of the configured strategy.
    pub fn respond(&self, input: &str) -> String {
        matcher::find_best_response(input, &self.knowledge.starters, &self.knowledge.knowledge)
    }

    /// Answers `input` with the configured strategy, without recording it anywhere.
    ///
    /// `context` is the generator history; it only changes when the legacy
    /// strategy gets a generated reply.
    pub async fn answer(&self, context: &mut ConversationContext, input: &str) -> Result<String> {
        match self.strategy {
            MatchStrategy::Canonical => Ok(self.respond(input)),
            MatchStrategy::Legacy => self.legacy_answer(context, input).await,
        }
    }

    /// Answers `input` and appends both turns to the session transcript.
    pub async fn reply(&self, session: &mut Session, input: &str) -> Result<String> {
        let answer = self.answer(session.context_mut(), input).await?;
        session.record(input, &answer);
        Ok(answer)
    }

    async fn legacy_answer(&self, context: &mut ConversationContext, input: &str) -> Result<String> {
        if let Some(answer) = matcher::find_keyword_response(input, &self.knowledge.knowledge) {
            debug!("Legacy keyword match");
            return Ok(answer.to_string());
        }

        let generator = self.generator.get().await?;
        match generator.generate(context, input).await {
            GenerationOutcome::Generated(text) => {
                context.push(input, &text);
                Ok(matcher::with_promotion(input, text))
            }
            GenerationOutcome::Failed(reason) => {
                warn!("Reply generation failed: {}", reason);
                Ok(APOLOGY.to_string())
            }
        }
    }
}
