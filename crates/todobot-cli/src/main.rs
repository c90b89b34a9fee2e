//! Console front end for the dialog engine.
//!
//! Acts as a local event source: reads lines from stdin, maps them onto
//! inbound events, and prints the outbound actions the engine produces.
//! Lines starting with `/` are commands, lines starting with `@` are raw
//! callback tokens (as a button press would deliver), everything else is
//! free text. All input is attributed to a single local user.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use todobot_clients::{ClientConfig, HttpCommentClient, HttpTaskClient};
use todobot_core::{CommandName, InMemorySessionStore, InboundEvent, Outbound, UserId};
use todobot_engine::{DialogEngine, Dispatcher, EventSink};

const COMMANDS: &[&str] = &[
    "/start",
    "/tasks",
    "/add",
    "/categories",
    "/search",
    "/stats",
    "/deadlines",
    "/archive",
    "/help",
];

#[derive(Parser)]
#[command(name = "todobot")]
#[command(about = "Console front end for the to-do dialog engine", long_about = None)]
struct Cli {
    /// Base URL of the task/category store
    #[arg(long)]
    task_url: Option<String>,

    /// Base URL of the comment store
    #[arg(long)]
    comment_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Local user id all input is attributed to
    #[arg(long, default_value_t = 1)]
    user: i64,
}

/// Rustyline helper: completion and hints for slash commands.
#[derive(Clone)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else if line.starts_with('@') {
            Owned(line.bright_magenta().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints outbound actions to the terminal.
struct ConsoleSink;

#[async_trait]
impl EventSink for ConsoleSink {
    async fn deliver(&self, _user_id: UserId, action: Outbound) {
        match action {
            Outbound::Menu { text, options } => {
                println!("{}", text.bright_blue());
                for option in options {
                    println!(
                        "  {} {}",
                        format!("[{}]", option.label).bright_blue(),
                        format!("@{}", option.token.as_data()).bright_black()
                    );
                }
            }
            Outbound::Prompt { text } => {
                println!("{}", text.yellow());
            }
            Outbound::Report { message, .. } if message.is_empty() => {}
            Outbound::Report { outcome, message } => {
                let line = match outcome {
                    todobot_core::ReportOutcome::Success => message.green(),
                    todobot_core::ReportOutcome::Failure => message.red(),
                };
                println!("{line}");
            }
        }
    }
}

fn parse_event(input: &str, user_id: UserId) -> Option<InboundEvent> {
    if let Some(name) = input.strip_prefix('/') {
        match CommandName::parse(name) {
            Some(name) => Some(InboundEvent::Command { name, user_id }),
            None => {
                println!("{}", "Unknown command".bright_black());
                None
            }
        }
    } else if let Some(data) = input.strip_prefix('@') {
        Some(InboundEvent::Callback {
            data: data.to_string(),
            user_id,
        })
    } else {
        Some(InboundEvent::Text {
            content: input.to_string(),
            user_id,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::try_from_env()?;
    if let Some(url) = cli.task_url {
        config.task_service_url = url;
    }
    if let Some(url) = cli.comment_url {
        config.comment_service_url = url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    let tasks = Arc::new(HttpTaskClient::from_config(&config)?);
    let comments = Arc::new(HttpCommentClient::from_config(&config)?);
    let sessions = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(DialogEngine::new(sessions, tasks, comments));
    let dispatcher = Dispatcher::new(engine, Arc::new(ConsoleSink));

    let user_id = UserId(cli.user);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== todobot ===".bright_magenta().bold());
    println!(
        "{}",
        "Commands start with '/', button presses with '@'; anything else is free text. \
         Type '/start' for the menu or 'quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(event) = parse_event(trimmed, user_id) {
                    dispatcher.submit(event).await;
                    // Let the worker print its response before the next prompt.
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
