//! Interactive chat loop
//!
//! Reads one line per turn, runs it through the agent, prints the terminal
//! output. Slash commands for in-session control; line history persists
//! across runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};

use llm_api::DeepSeekClient;

use crate::agent::{AgentConfig, AgentLoop, TurnError};
use crate::config::{resolve_db_path, UserConfig};
use crate::store::TodoStore;

// ANSI colors
const CYAN: &str = "\x1b[96m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// REPL input history manager
struct InputHistory {
    path: PathBuf,
}

impl InputHistory {
    fn new() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todo-agent");

        fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join("history"),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Run the interactive agent REPL
pub async fn run(model: Option<String>, db: Option<PathBuf>, verbose: bool) -> Result<()> {
    let user_config = UserConfig::load().unwrap_or_default();

    let api_key = std::env::var(llm_api::API_KEY_ENV).with_context(|| {
        format!(
            "{} is not set; export your API key to chat with the agent",
            llm_api::API_KEY_ENV
        )
    })?;

    // Model and endpoint: CLI arg > config file > defaults
    let model = model
        .or_else(|| user_config.model.name.clone())
        .unwrap_or_else(|| llm_api::DEFAULT_MODEL.to_string());
    let base_url = user_config
        .model
        .base_url
        .clone()
        .unwrap_or_else(|| llm_api::DEFAULT_BASE_URL.to_string());

    let db_path = resolve_db_path(db, &user_config);
    let store = TodoStore::open(&db_path).await?;

    let client = DeepSeekClient::new(base_url, api_key);
    let agent_config = AgentConfig::new(model.clone()).with_verbose(verbose);
    let mut agent = AgentLoop::new(Box::new(client), store, agent_config);

    // Setup readline
    let history = InputHistory::new()?;
    let mut rl: Editor<(), DefaultHistory> = DefaultEditor::new()?;
    let _ = rl.load_history(history.path());

    print_welcome(&model);

    // Main REPL loop: one agent turn per line
    loop {
        let prompt = format!("{}>>{} ", CYAN, RESET);

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with('/') {
                    match handle_slash_command(&agent, line).await {
                        Ok(true) => break,
                        Ok(false) => continue,
                        Err(e) => {
                            eprintln!("{}Error:{} {}", YELLOW, RESET, e);
                            continue;
                        }
                    }
                }

                match agent.run_turn(line).await {
                    Ok(output) => println!("{}", output),
                    Err(TurnError::Model(e)) => {
                        eprintln!("{}Model error:{} {}", YELLOW, RESET, e);
                    }
                    Err(e @ TurnError::ProtocolExhausted { .. }) => {
                        eprintln!("{}Error:{} {}", YELLOW, RESET, e);
                        eprintln!("The turn was abandoned; please try rephrasing.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}^C{}", DIM, RESET);
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}Goodbye!{}", DIM, RESET);
                break;
            }
            Err(e) => {
                eprintln!("{}Error:{} {}", YELLOW, RESET, e);
                break;
            }
        }
    }

    // Save history
    let _ = rl.save_history(history.path());

    Ok(())
}

fn print_welcome(model: &str) {
    println!();
    println!("{}╭─────────────────────────────────────────╮{}", DIM, RESET);
    println!(
        "{}│{} {}todo{} - Conversational To-Do Agent       {}│{}",
        DIM, RESET, BOLD, RESET, DIM, RESET
    );
    println!(
        "{}│{} Model: {}{}{}                      {}│{}",
        DIM,
        RESET,
        BLUE,
        truncate(model, 25),
        RESET,
        DIM,
        RESET
    );
    println!(
        "{}│{} Type {}/help{} for commands                  {}│{}",
        DIM, RESET, CYAN, RESET, DIM, RESET
    );
    println!("{}╰─────────────────────────────────────────╯{}", DIM, RESET);
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        format!("{:width$}", s, width = max)
    } else {
        format!("{}...", &s[..max - 3])
    }
}

/// Handle slash commands; returns true when the REPL should exit
async fn handle_slash_command(agent: &AgentLoop, input: &str) -> Result<bool> {
    let cmd = input.split_whitespace().next().unwrap_or("").to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => {
            print_help();
            Ok(false)
        }
        "/exit" | "/quit" | "/q" => {
            println!("{}Goodbye!{}", DIM, RESET);
            Ok(true)
        }
        "/todos" | "/t" => {
            let todos = agent.store().list_all().await?;
            if todos.is_empty() {
                println!("No todos");
            } else {
                println!("{}Todos:{}", BOLD, RESET);
                for t in &todos {
                    println!("  {}[{}]{} {}", CYAN, t.id, RESET, t.todo);
                }
            }
            Ok(false)
        }
        _ => {
            println!("{}Unknown command:{} {}", YELLOW, RESET, cmd);
            println!("Type {}/help{} for available commands", CYAN, RESET);
            Ok(false)
        }
    }
}

fn print_help() {
    println!();
    println!("{}Commands:{}", BOLD, RESET);
    println!("  {}/help{}, /h, /?      Show this help", CYAN, RESET);
    println!("  {}/todos{}, /t        List todos without asking the model", CYAN, RESET);
    println!("  {}/exit{}, /quit, /q  Exit", CYAN, RESET);
    println!();
    println!("{}Tips:{}", DIM, RESET);
    println!("  - Describe what you want in plain language, e.g. \"add buy milk\"");
    println!("  - Each line is a fresh turn; the agent does not remember prior turns");
    println!("  - Press Ctrl+D to exit");
    println!();
}
