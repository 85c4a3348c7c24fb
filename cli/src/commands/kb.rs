//! # Knowledge Commands
//!
//! File: cli/src/commands/kb.rs
//!
//! ## Overview
//!
//! `lookaroun kb` inspects the tables the assistant answers from:
//!
//! ```bash
//! # Show the effective tables (built-in, or the configured file)
//! lookaroun kb list
//!
//! # Validate a knowledge file before pointing the configuration at it
//! lookaroun kb check ./knowledge.toml
//! ```
//!
use super::{build_assistant, AssistantArgs};
use crate::bot::knowledge::{KnowledgeBase, KnowledgeTable};
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// # Knowledge Command Group Arguments (`KbArgs`)
#[derive(Parser, Debug)]
pub struct KbArgs {
    #[command(subcommand)]
    command: KbCommand,
}

#[derive(Subcommand, Debug)]
enum KbCommand {
    /// Lists the starter and knowledge entries in matching order.
    List(ListArgs),
    /// Validates a knowledge file and reports its size.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    #[command(flatten)]
    assistant: AssistantArgs,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// The knowledge file to validate.
    file: PathBuf,
}

pub async fn handle_kb(args: KbArgs) -> Result<()> {
    match args.command {
        KbCommand::List(args) => handle_list(args),
        KbCommand::Check(args) => handle_check(args),
    }
}

fn handle_list(args: ListArgs) -> Result<()> {
    let (_config, assistant) = build_assistant(&args.assistant)?;
    let base = assistant.knowledge();
    print!("{}", render_table("Conversation starters", &base.starters));
    println!();
    print!("{}", render_table("Knowledge base", &base.knowledge));
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let base = KnowledgeBase::load(&args.file)?;
    println!(
        "OK: {} ({} starters, {} knowledge entries)",
        args.file.display(),
        base.starters.len(),
        base.knowledge.len()
    );
    Ok(())
}

fn render_table(title: &str, table: &KnowledgeTable) -> String {
    let mut out = format!("{} ({}):\n", title, table.len());
    if table.is_empty() {
        out.push_str("  (none)\n");
    }
    for (index, entry) in table.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {:<28} {}\n",
            index + 1,
            entry.trigger,
            preview(&entry.answer, 60)
        ));
    }
    out
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with `...`.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
