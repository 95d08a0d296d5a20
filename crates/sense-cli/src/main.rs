//! Sense CLI: chat with a local code assistant from the terminal.

mod console;
mod editor;
mod json;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sense_core::{classify_with_rule, complete, History, RequestContext, Synthesizer};
use sense_session::{AutoDecline, Collaborators, Confirmer, Session, SessionConfig};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::editor::Document;

#[derive(Parser)]
#[command(name = "sense")]
#[command(about = "Local code assistant: classify requests, draft code, run workspace actions")]
#[command(version)]
struct Cli {
    /// Workspace root used for file, git and terminal actions
    #[arg(short, long, global = true, default_value = ".")]
    workspace: PathBuf,

    /// Number of messages kept in the conversation history
    #[arg(long, global = true, default_value = "20")]
    history_capacity: usize,

    /// Seed for template selection (reproducible replies)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Pause before each reply, in milliseconds
    #[arg(long, global = true, default_value = "0")]
    thinking_delay_ms: u64,

    /// Enable info-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat {
        /// Document to open at start
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Speak line-delimited JSON panel messages on stdin/stdout
        #[arg(long)]
        json: bool,
    },

    /// Classify one message and print the intent as JSON
    Classify {
        message: String,

        /// Text selected in the editor
        #[arg(short, long)]
        selection: Option<String>,

        /// File whose content is visible in the editor
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Answer one encoded request (e.g. "generate: fetch") and print the response as JSON
    Respond {
        request: String,
    },

    /// List inline completions for a line prefix
    Complete {
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "sense=info" } else { "sense=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = SessionConfig::default()
        .with_workspace_root(&cli.workspace)
        .with_history_capacity(cli.history_capacity)
        .with_thinking_delay_ms(cli.thinking_delay_ms);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    match cli.command.unwrap_or(Commands::Chat {
        file: None,
        json: false,
    }) {
        Commands::Chat { file, json: true } => {
            if file.is_some() {
                tracing::warn!("--file is ignored in JSON mode");
            }
            let collaborators = Collaborators::local(&config, Arc::new(AutoDecline));
            json::run(Session::new(config, collaborators)).await?;
        }
        Commands::Chat { file, json: false } => {
            let document = match file {
                Some(path) => Some(Document::open(&path).await?),
                None => None,
            };
            let input = console::shared_stdin();
            let confirmer: Arc<dyn Confirmer> =
                Arc::new(console::StdinConfirmer::new(input.clone()));
            let collaborators = Collaborators::local(&config, confirmer);
            console::run(Session::new(config, collaborators), input, document).await?;
        }
        Commands::Classify {
            message,
            selection,
            file,
        } => {
            let file_content = match file {
                Some(path) => Some(tokio::fs::read_to_string(&path).await?),
                None => None,
            };
            let history = History::default();
            let context = RequestContext {
                selected_text: selection.as_deref(),
                file_content: file_content.as_deref(),
                history: Some(&history),
            };
            let (intent, rule) = classify_with_rule(&message, &context);
            let output = json!({
                "intent": intent,
                "rule": rule,
                "requiresConfirmation": intent.requires_confirmation(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Respond { request } => {
            let mut synthesizer = match cli.seed {
                Some(seed) => Synthesizer::seeded(seed),
                None => Synthesizer::new(),
            };
            let response = synthesizer.respond(&request, None);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Complete { prefix } => {
            println!("{}", serde_json::to_string_pretty(&complete(&prefix))?);
        }
    }

    Ok(())
}
