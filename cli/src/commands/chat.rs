//! # Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! `lookaroun chat` runs a terminal conversation with the assistant. The REPL
//! keeps one session for its whole lifetime:
//!
//! - `/clear` empties the transcript and starts over
//! - `/history` prints the transcript so far
//! - `bye` (or end of input) quits
//!
//! If the conversational generator cannot be started (legacy strategy), the
//! conversation ends with that error; restarting the command retries.
//!
use super::{build_assistant, AssistantArgs};
use crate::bot::assistant::Assistant;
use crate::bot::session::{Role, Session};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub assistant: AssistantArgs,
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let (_config, assistant) = build_assistant(&args.assistant)?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_repl(&assistant, stdin, &mut stdout).await
}

/// Reads messages from `reader` until `bye` or end of input, writing replies to `out`.
pub async fn run_repl<R, W>(assistant: &Assistant, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new();
    info!("Starting terminal chat session {}", session.id());

    writeln!(
        out,
        "Chat with the LookAroun Assistant! Type '/clear' to start over, 'bye' to quit."
    )?;

    let mut lines = reader.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(out)?;
            break;
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("bye") {
            writeln!(out, "LookAroun: Goodbye!")?;
            break;
        }
        if trimmed == "/clear" {
            session.clear();
            writeln!(out, "(conversation cleared)")?;
            continue;
        }
        if trimmed == "/history" {
            for turn in session.transcript() {
                let speaker = match turn.role {
                    Role::User => "You",
                    Role::Assistant => "LookAroun",
                };
                writeln!(out, "  [{}] {}: {}", turn.at.format("%H:%M:%S"), speaker, turn.text)?;
            }
            continue;
        }

        let answer = assistant.reply(&mut session, trimmed).await?;
        writeln!(out, "LookAroun: {}", answer)?;
    }

    info!(
        "Terminal chat session {} ended after {} turns",
        session.id(),
        session.transcript().len()
    );
    Ok(())
}
