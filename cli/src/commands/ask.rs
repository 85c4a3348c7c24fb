//! # Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! `lookaroun ask <QUESTION>...` prints the assistant's answer to one question
//! and exits. The words of the question are joined with single spaces, so
//! quoting is optional:
//!
//! ```bash
//! lookaroun ask what is LookAroun
//! lookaroun ask "How much does it cost?"
//! ```
//!
use super::{build_assistant, AssistantArgs};
use crate::bot::session::ConversationContext;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to answer.
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,

    #[command(flatten)]
    pub assistant: AssistantArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let question = args.question.join(" ");
    info!("Answering one-shot question: {:?}", question);

    let (_config, assistant) = build_assistant(&args.assistant)?;
    let mut context = ConversationContext::default();
    let answer = assistant.answer(&mut context, &question).await?;

    println!("{}", answer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_multi_word_question() {
        let args = AskArgs::try_parse_from(["ask", "what", "is", "lookaroun"]).unwrap();
        assert_eq!(args.question.join(" "), "what is lookaroun");
        assert!(args.assistant.strategy.is_none());
    }

    #[test]
    fn test_requires_question() {
        assert!(AskArgs::try_parse_from(["ask"]).is_err());
    }

    #[test]
    fn test_parses_strategy_flag() {
        let args = AskArgs::try_parse_from(["ask", "--strategy", "legacy", "hi"]).unwrap();
        assert_eq!(
            args.assistant.strategy,
            Some(crate::bot::matcher::MatchStrategy::Legacy)
        );
    }
}
