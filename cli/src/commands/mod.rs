//! # LookAroun Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the `lookaroun` CLI and
//! the arguments they share.
//!
//! ## Commands
//!
//! - `serve`: HTTP chat server (web page + JSON API)
//! - `chat`: Interactive terminal conversation
//! - `ask`: Answer a single question and exit
//! - `kb`: Inspect or validate knowledge tables
//!
//! Each command defines its own arguments structure and an async handler.
//! All of them build an `Assistant` the same way: load the layered
//! configuration, apply the shared `AssistantArgs` overrides, then construct
//! the assistant from the result.
//!
use crate::bot::assistant::Assistant;
use crate::bot::matcher::MatchStrategy;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

/// Command for answering one question from the command line.
pub mod ask;
/// Command for an interactive terminal conversation.
pub mod chat;
/// Command group for listing and checking knowledge tables.
pub mod kb;
/// Command for the HTTP chat server.
pub mod serve;

/// Flags shared by every command that builds an assistant.
#[derive(Args, Debug, Clone, Default)]
pub struct AssistantArgs {
    /// Knowledge file replacing the built-in tables (overrides `[knowledge] file`).
    #[arg(long, short = 'k', value_name = "FILE")]
    pub knowledge: Option<PathBuf>,

    /// Matching strategy (overrides `[assistant] strategy`).
    #[arg(long, value_enum)]
    pub strategy: Option<MatchStrategy>,
}

impl AssistantArgs {
    /// Applies the command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.knowledge {
            config.knowledge.file = Some(path.to_string_lossy().into_owned());
        }
        if let Some(strategy) = self.strategy {
            config.assistant.strategy = strategy;
        }
    }
}

/// Loads the configuration, applies `args` and builds the assistant.
pub fn build_assistant(args: &AssistantArgs) -> Result<(Config, Assistant)> {
    let mut config = config::load_config()?;
    args.apply(&mut config);
    debug!("Effective configuration: {:?}", config);
    let assistant = Assistant::from_config(&config)?;
    Ok((config, assistant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_config() {
        let mut config = Config::default();
        let args = AssistantArgs {
            knowledge: Some(PathBuf::from("/tmp/kb.toml")),
            strategy: Some(MatchStrategy::Legacy),
        };

        args.apply(&mut config);

        assert_eq!(config.knowledge.file.as_deref(), Some("/tmp/kb.toml"));
        assert_eq!(config.assistant.strategy, MatchStrategy::Legacy);
    }

    #[test]
    fn test_apply_without_flags_keeps_config() {
        let mut config = Config::default();
        config.knowledge.file = Some("from-file.toml".into());

        AssistantArgs::default().apply(&mut config);

        assert_eq!(config.knowledge.file.as_deref(), Some("from-file.toml"));
        assert_eq!(config.assistant.strategy, MatchStrategy::Canonical);
    }
}
