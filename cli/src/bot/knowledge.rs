//! # Knowledge Tables
//!
//! File: cli/src/bot/knowledge.rs
//!
//! ## Overview
//!
//! The assistant answers from two ordered trigger → answer tables:
//! - **starters**: greetings, thanks and similar openers, matched by substring
//!   before anything else
//! - **knowledge**: product questions, matched by word overlap
//!
//! Table order is significant (first starter hit wins, ties in the knowledge
//! table go to the earlier entry), so tables are kept as ordered vectors
//! rather than maps.
//!
//! Tables are validated on construction: triggers are trimmed and lowercased,
//! must be non-empty and unique, and every answer must be non-empty.
//!
//! ## Knowledge files
//!
//! The built-in LookAroun tables can be replaced by a TOML file:
//!
//! ```toml
//! [[starters]]
//! trigger = "hello"
//! answer = "Hello! Ask me anything about LookAroun."
//!
//! [[knowledge]]
//! trigger = "pricing"
//! answer = "We offer several plans..."
//! ```
//!
use crate::core::config::Config;
use crate::core::error::{LookarounError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// A single trigger phrase and the answer it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeEntry {
    pub trigger: String,
    pub answer: String,
}

/// Ordered, validated list of knowledge entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeTable {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeTable {
    /// Builds a table from `(trigger, answer)` pairs, keeping their order.
    ///
    /// ## Errors
    ///
    /// Returns `LookarounError::Knowledge` if a trigger is empty or repeated
    /// (case-insensitively), or if an answer is empty.
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(trigger, answer)| KnowledgeEntry {
                trigger: trigger.into(),
                answer: answer.into(),
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Validates and normalizes already-built entries.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            let trigger = normalize_trigger(&entry.trigger);
            if trigger.is_empty() {
                return Err(anyhow!(LookarounError::Knowledge(format!(
                    "Empty trigger phrase for answer '{}'.",
                    entry.answer
                ))));
            }
            if entry.answer.trim().is_empty() {
                return Err(anyhow!(LookarounError::Knowledge(format!(
                    "Trigger '{}' has an empty answer.",
                    trigger
                ))));
            }
            if !seen.insert(trigger.clone()) {
                return Err(anyhow!(LookarounError::Knowledge(format!(
                    "Duplicate trigger phrase '{}'.",
                    trigger
                ))));
            }
            normalized.push(KnowledgeEntry {
                trigger,
                answer: entry.answer,
            });
        }
        Ok(Self {
            entries: normalized,
        })
    }

    /// Builds a table from compile-time data that is known to be valid.
    fn from_static(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(trigger, answer)| KnowledgeEntry {
                    trigger: normalize_trigger(trigger),
                    answer: (*answer).to_string(),
                })
                .collect(),
        }
    }

    /// Looks up the answer for an exact (normalized) trigger phrase.
    pub fn get(&self, trigger: &str) -> Option<&str> {
        let wanted = normalize_trigger(trigger);
        self.entries
            .iter()
            .find(|entry| entry.trigger == wanted)
            .map(|entry| entry.answer.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercases a trigger and collapses its whitespace to single spaces.
fn normalize_trigger(trigger: &str) -> String {
    trigger
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The starter and knowledge tables the assistant answers from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub starters: KnowledgeTable,
    pub knowledge: KnowledgeTable,
}

/// On-disk layout of a knowledge file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct KnowledgeFile {
    #[serde(default)]
    starters: Vec<KnowledgeEntry>,
    #[serde(default)]
    knowledge: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// The LookAroun tables shipped with the assistant.
    pub fn builtin() -> Self {
        Self {
            starters: KnowledgeTable::from_static(BUILTIN_STARTERS),
            knowledge: KnowledgeTable::from_static(BUILTIN_KNOWLEDGE),
        }
    }

    /// Parses a knowledge file from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: KnowledgeFile =
            toml::from_str(content).context("Failed to parse knowledge file")?;
        if file.knowledge.is_empty() {
            return Err(anyhow!(LookarounError::Knowledge(
                "A knowledge file must define at least one [[knowledge]] entry.".to_string()
            )));
        }
        Ok(Self {
            starters: KnowledgeTable::from_entries(file.starters)
                .context("Invalid [[starters]] table")?,
            knowledge: KnowledgeTable::from_entries(file.knowledge)
                .context("Invalid [[knowledge]] table")?,
        })
    }

    /// Reads and validates a knowledge file.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading knowledge tables from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
        let base = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid knowledge file: {}", path.display()))?;
        debug!(
            "Loaded {} starters and {} knowledge entries",
            base.starters.len(),
            base.knowledge.len()
        );
        Ok(base)
    }

    /// Uses the configured knowledge file, or the built-in tables when none is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.knowledge.file {
            Some(file) => Self::load(Path::new(file)),
            None => {
                debug!("No knowledge file configured, using built-in tables");
                Ok(Self::builtin())
            }
        }
    }
}

pub const ABOUT_TITLE: &str = "About LookAroun";

/// Sidebar highlights shown next to the chat.
pub const ABOUT_HIGHLIGHTS: &[&str] = &[
    "Smart networking for B2B events",
    "Instant messaging",
    "Advanced participant filtering",
    "Event agenda integration",
];

/// Example questions offered to new users.
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What is LookAroun?",
    "How does pricing work?",
    "What features do you have?",
    "How can I get a demo?",
];

const GREETING: &str = "Hello! I'm the LookAroun Assistant. Ask me about our features, pricing, how it works, or how to get a demo.";
const THANKS: &str = "You're welcome! Is there anything else you'd like to know about LookAroun?";

const BUILTIN_STARTERS: &[(&str, &str)] = &[
    ("hello", GREETING),
    ("good morning", GREETING),
    ("good afternoon", GREETING),
    ("good evening", GREETING),
    ("thank you", THANKS),
    ("thanks", THANKS),
    (
        "goodbye",
        "Goodbye! Enjoy your next event, and come back any time you have questions about LookAroun.",
    ),
    (
        "who are you",
        "I'm the LookAroun Assistant. I answer questions about LookAroun, the networking app for professional events.",
    ),
];

const BUILTIN_KNOWLEDGE: &[(&str, &str)] = &[
    (
        "what is lookaroun",
        "LookAroun is a mobile networking app for B2B professional events. It helps participants make targeted connections through smart matching and real-time messaging.",
    ),
    (
        "pricing",
        "We offer several plans: Initiation (basic features), Connexion (7-day access), Influence (14-day access), and subscription plans for event organizers.",
    ),
    (
        "how does lookaroun work",
        "LookAroun uses intelligent targeting to match participants based on their professional goals. You can filter, message, and connect with the right people at events.",
    ),
    (
        "features",
        "Key features include: smart participant matching, instant messaging, advanced filters, event agenda integration, and post-event contact management.",
    ),
    (
        "demo",
        "Contact us through our website to schedule a free demo. We'll show you how LookAroun can improve networking at your events.",
    ),
    (
        "event organizers",
        "Event organizers can subscribe to LookAroun to offer smart networking to their participants, with agenda integration and a dedicated space for each event.",
    ),
    (
        "messaging chat",
        "Instant messaging lets you contact relevant participants before, during and after the event, and arrange meetings directly in the app.",
    ),
    (
        "matching targeting",
        "Smart matching compares participants' professional goals and interests to suggest the people most relevant to you at each event.",
    ),
    (
        "contact support",
        "You can reach the LookAroun team through the contact form on our website.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_tables_pass_validation() {
        // The built-in data skips validation at runtime, so check it here.
        assert!(KnowledgeTable::new(BUILTIN_STARTERS.iter().copied()).is_ok());
        assert!(KnowledgeTable::new(BUILTIN_KNOWLEDGE.iter().copied()).is_ok());
    }

    #[test]
    fn builtin_has_entries_used_by_fallbacks() {
        let base = KnowledgeBase::builtin();
        assert!(base.knowledge.get("pricing").is_some());
        assert!(base.knowledge.get("how does lookaroun work").is_some());
        assert!(base.knowledge.get("demo").is_some());
    }

    #[test]
    fn builtin_starters_do_not_hide_inside_common_words() {
        let base = KnowledgeBase::builtin();
        for entry in base.starters.iter() {
            for word in ["this", "which", "shipping", "everything", "them"] {
                assert!(
                    !word.contains(&entry.trigger),
                    "starter '{}' matches inside '{}'",
                    entry.trigger,
                    word
                );
            }
        }
    }

    #[test]
    fn triggers_are_normalized() {
        let table = KnowledgeTable::new([("  What   IS LookAroun ", "An app.")]).unwrap();
        assert_eq!(table.iter().next().unwrap().trigger, "what is lookaroun");
        assert_eq!(table.get("WHAT is lookaroun"), Some("An app."));
    }

    #[test]
    fn rejects_duplicate_triggers() {
        let result = KnowledgeTable::new([("Pricing", "a"), ("pricing", "b")]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate trigger phrase 'pricing'"));
    }

    #[test]
    fn rejects_empty_answer_and_trigger() {
        assert!(KnowledgeTable::new([("pricing", "   ")]).is_err());
        assert!(KnowledgeTable::new([("  ", "answer")]).is_err());
    }

    #[test]
    fn keeps_insertion_order() {
        let table = KnowledgeTable::new([("b", "2"), ("a", "1"), ("c", "3")]).unwrap();
        let triggers: Vec<_> = table.iter().map(|e| e.trigger.as_str()).collect();
        assert_eq!(triggers, ["b", "a", "c"]);
    }

    #[test]
    fn parses_knowledge_file() {
        let content = r#"
            [[starters]]
            trigger = "hey there"
            answer = "Hi!"

            [[knowledge]]
            trigger = "opening hours"
            answer = "Nine to five."

            [[knowledge]]
            trigger = "pricing"
            answer = "Free."
        "#;
        let base = KnowledgeBase::from_toml_str(content).unwrap();
        assert_eq!(base.starters.len(), 1);
        assert_eq!(base.knowledge.len(), 2);
        assert_eq!(base.knowledge.iter().next().unwrap().trigger, "opening hours");
    }

    #[test]
    fn knowledge_file_without_starters_is_allowed() {
        let base =
            KnowledgeBase::from_toml_str("[[knowledge]]\ntrigger = \"demo\"\nanswer = \"Yes.\"\n")
                .unwrap();
        assert!(base.starters.is_empty());
    }

    #[test]
    fn knowledge_file_needs_knowledge_entries() {
        let result = KnowledgeBase::from_toml_str("[[starters]]\ntrigger = \"hi\"\nanswer = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_reports_path_on_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("kb.toml");
        std::fs::write(&path, "[[knowledge]]\ntrigger = \"demo\"\n").unwrap();

        let err = KnowledgeBase::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("kb.toml"));
    }

    #[test]
    fn from_config_defaults_to_builtin() {
        let base = KnowledgeBase::from_config(&Config::default()).unwrap();
        assert_eq!(base, KnowledgeBase::builtin());
    }
}
