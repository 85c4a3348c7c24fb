//! # Response Matcher
//!
//! File: cli/src/bot/matcher.rs
//!
//! ## Overview
//!
//! Picks the answer for a user message. The canonical matcher works in three
//! tiers:
//! 1. **Starters**: the first starter trigger found as a substring of the
//!    lowercased input wins outright. Punctuation is kept for this check.
//! 2. **Knowledge**: the input is stripped of punctuation and split into
//!    tokens; each entry scores one point per input token that appears among
//!    its trigger words. The strictly highest score wins, so on a tie the
//!    earlier entry is kept.
//! 3. **Fallback**: with no overlap at all, a few keyword families route to
//!    the pricing, how-it-works or demo answers, and anything else gets the
//!    generic invitation to ask.
//!
//! The matcher is a pure function of its inputs and never fails.
//!
//! The legacy matcher (`find_keyword_response`) is kept for the deprecated
//! `legacy` strategy: it returns the first entry having any trigger word
//! contained in the input, and defers everything else to a conversational
//! generator.
//!
use crate::bot::knowledge::KnowledgeTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generic reply when nothing in the tables applies.
pub const FALLBACK_ANSWER: &str = "I'd be happy to help you learn about LookAroun! You can ask me about our features, pricing, how it works, or request a demo. What interests you most?";

/// Appended to short or networking-related generated replies (legacy strategy).
pub const PROMOTION: &str = " For professional networking events, LookAroun can help you make more meaningful connections efficiently.";

/// Replaces a generated reply when generation fails (legacy strategy).
pub const APOLOGY: &str = "I'm having some technical difficulties. Could you try rephrasing your question about LookAroun or networking?";

/// Generated replies shorter than this (in characters) get the promotion.
const PROMOTION_MIN_REPLY_CHARS: usize = 20;

/// Keyword families tried, in order, when no knowledge entry overlaps the input.
const FALLBACK_RULES: &[(&[&str], &str)] = &[
    (&["price", "cost", "money", "pay"], "pricing"),
    (&["how", "work", "use"], "how does lookaroun work"),
    (&["demo", "trial", "test"], "demo"),
];

/// Which matching behaviour the assistant uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Starters, scored word overlap, then keyword fallbacks.
    #[default]
    Canonical,
    /// Deprecated: any-word containment, then the conversational generator.
    Legacy,
}

/// Returns the best answer for `input` from the starter and knowledge tables.
pub fn find_best_response(
    input: &str,
    starters: &KnowledgeTable,
    knowledge: &KnowledgeTable,
) -> String {
    let lowered = input.to_lowercase();

    if let Some(entry) = starters
        .iter()
        .find(|entry| lowered.contains(entry.trigger.as_str()))
    {
        debug!("Matched conversation starter '{}'", entry.trigger);
        return entry.answer.clone();
    }

    let tokens = tokenize(&lowered);

    let mut best_score = 0;
    let mut best_answer: Option<&str> = None;
    for entry in knowledge.iter() {
        let key_tokens: Vec<&str> = entry.trigger.split_whitespace().collect();
        let score = overlap_score(&tokens, &key_tokens);
        if score > best_score {
            best_score = score;
            best_answer = Some(&entry.answer);
            debug!("Knowledge entry '{}' leads with score {}", entry.trigger, score);
        }
    }

    match best_answer {
        Some(answer) => answer.to_string(),
        None => fallback_answer(&tokens, knowledge),
    }
}

/// Strips everything but word characters and whitespace, then splits on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Counts input tokens (with repetition) that appear among the key's words.
fn overlap_score(tokens: &[String], key_tokens: &[&str]) -> usize {
    tokens
        .iter()
        .filter(|token| key_tokens.contains(&token.as_str()))
        .count()
}

fn fallback_answer(tokens: &[String], knowledge: &KnowledgeTable) -> String {
    for (keywords, trigger) in FALLBACK_RULES {
        if !tokens.iter().any(|token| keywords.contains(&token.as_str())) {
            continue;
        }
        // A rule whose target entry is missing from the table falls through.
        if let Some(answer) = knowledge.get(trigger) {
            debug!("No overlap, routed to '{}' by keyword fallback", trigger);
            return answer.to_string();
        }
    }
    debug!("No overlap and no fallback keyword, using generic answer");
    FALLBACK_ANSWER.to_string()
}

/// Legacy rule: first entry with any trigger word contained in the input.
pub fn find_keyword_response<'a>(input: &str, knowledge: &'a KnowledgeTable) -> Option<&'a str> {
    let lowered = input.to_lowercase();
    knowledge
        .iter()
        .find(|entry| {
            entry
                .trigger
                .split_whitespace()
                .any(|word| lowered.contains(word))
        })
        .map(|entry| entry.answer.as_str())
}

/// Legacy rule: promote LookAroun after short or networking-related replies.
pub fn with_promotion(input: &str, mut reply: String) -> String {
    if reply.chars().count() < PROMOTION_MIN_REPLY_CHARS
        || input.to_lowercase().contains("networking")
    {
        reply.push_str(PROMOTION);
    }
    reply
}
