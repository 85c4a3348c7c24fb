//! # LookAroun Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point of the `lookaroun` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers in the `lookaroun` library
//!
//! ## Examples
//!
//! ```bash
//! # Start the web chat on http://127.0.0.1:8501
//! lookaroun serve
//!
//! # Ask one question with request logging
//! lookaroun -v ask what is LookAroun
//! ```
//!
//! Any error reaching this level is logged, printed as `Error: ...` on stderr
//! and ends the process with exit status 1.
//!
use clap::Parser;
use lookaroun::commands;
use tracing_subscriber::{fmt, EnvFilter};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "lookaroun",
    about = "💬 LookAroun Assistant: answers questions about the LookAroun networking app",
    long_about = "Chat with the LookAroun Assistant in the browser or the terminal.\n\
                  Answers come from a keyword knowledge base; nothing is stored on disk.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Serve the chat page and JSON API over HTTP.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Chat with the assistant in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Answer a single question and exit.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// List or validate knowledge tables.
    Kb(commands::kb::KbArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Kb(args) => commands::kb::handle_kb(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
