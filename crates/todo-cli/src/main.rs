//! todo: conversational to-do list agent
//!
//! Manages a to-do list through natural-language instructions, with a
//! chat-completion model as the reasoning engine and SQLite as the store.

mod agent;
mod commands;
mod config;
mod repl;
mod store;
mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "todo")]
#[command(about = "Conversational to-do list agent", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Database file (defaults to the platform data dir)
    #[arg(long, env = "TODO_AGENT_DB", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the interactive agent chat
    Chat {
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Operate on the todo store directly (no model)
    Todos {
        #[command(subcommand)]
        action: TodoAction,
    },
}

#[derive(Debug, Subcommand)]
enum TodoAction {
    /// List all todos
    List,
    /// Add a todo
    Add {
        /// The todo text
        text: Vec<String>,
    },
    /// Remove a todo by id
    Rm {
        /// Id of the todo to remove
        id: i64,
    },
    /// Remove every todo
    Clear,
    /// Search todos by keyword (case-insensitive substring)
    Search {
        /// Keyword to search for
        keyword: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Chat { model }) => repl::run(model, cli.db, cli.verbose).await,
        Some(Commands::Todos { action }) => match action {
            TodoAction::List => commands::todos_list(cli.db).await,
            TodoAction::Add { text } => commands::todos_add(&text.join(" "), cli.db).await,
            TodoAction::Rm { id } => commands::todos_rm(id, cli.db).await,
            TodoAction::Clear => commands::todos_clear(cli.db).await,
            TodoAction::Search { keyword } => commands::todos_search(&keyword, cli.db).await,
        },
        None => {
            // Default to the chat REPL when no command specified
            repl::run(None, cli.db, cli.verbose).await
        }
    }
}
