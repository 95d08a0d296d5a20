//! Interactive terminal chat loop.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sense_session::{Confirmer, EditorState, Reply, Session};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::editor::Document;

/// Line reader over stdin shared by the chat loop and confirmation prompts.
pub type SharedInput = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn shared_stdin() -> SharedInput {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Asks for confirmation with a `[y/N]` prompt on the terminal.
pub struct StdinConfirmer {
    input: SharedInput,
}

impl StdinConfirmer {
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();

        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Open(PathBuf),
    Select(usize, usize),
    Unselect,
    Clear,
    Quit,
    Help,
    Message(String),
    Empty,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Input::Message(line.to_string()));
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((command, ""));
    match name {
        "open" if !arg.is_empty() => Ok(Input::Open(PathBuf::from(arg))),
        "open" => Err("Usage: /open PATH".to_string()),
        "select" => {
            let (start, end) = arg.split_once('-').unwrap_or((arg, arg));
            match (start.trim().parse(), end.trim().parse()) {
                (Ok(start), Ok(end)) => Ok(Input::Select(start, end)),
                _ => Err("Usage: /select START-END".to_string()),
            }
        }
        "unselect" => Ok(Input::Unselect),
        "clear" => Ok(Input::Clear),
        "quit" | "exit" => Ok(Input::Quit),
        "help" => Ok(Input::Help),
        other => Err(format!("Unknown command: /{}", other)),
    }
}

const HELP: &str = "Commands:
  /open PATH          open a document to work on
  /select START-END   select lines of the open document (1-based)
  /unselect           clear the selection
  /clear              forget the conversation
  /quit               leave
Anything else is sent to the assistant.";

/// Run the interactive chat loop until EOF or `/quit`.
pub async fn run(
    mut session: Session,
    input: SharedInput,
    mut document: Option<Document>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Sense chat. Type /help for commands.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = input.lock().await.next_line().await?;
        let Some(line) = line else { break };

        let parsed = match parse_input(&line) {
            Ok(parsed) => parsed,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match parsed {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Clear => {
                session.clear();
                println!("Conversation cleared.");
            }
            Input::Open(path) => match Document::open(&path).await {
                Ok(doc) => {
                    println!("Opened {} ({} lines).", path.display(), doc.line_count());
                    document = Some(doc);
                }
                Err(e) => println!("Could not open {}: {}", path.display(), e),
            },
            Input::Select(start, end) => match document.as_mut() {
                Some(doc) => match doc.select(start, end) {
                    Ok(()) => println!("Selected lines {}-{}.", start, end),
                    Err(message) => println!("{}", message),
                },
                None => println!("Open a document first with /open PATH."),
            },
            Input::Unselect => {
                if let Some(doc) = document.as_mut() {
                    doc.clear_selection();
                }
            }
            Input::Message(message) => {
                let editor = document
                    .as_ref()
                    .map(Document::editor_state)
                    .unwrap_or_else(EditorState::default);
                let reply = session.handle_message(&message, &editor).await;
                print_reply(&reply);
                apply_action(&reply, document.as_mut(), &input).await;
            }
        }
    }

    session.end();
    Ok(())
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.response.to_markdown());
}

async fn apply_action(reply: &Reply, document: Option<&mut Document>, input: &SharedInput) {
    let Some(action) = &reply.action else { return };
    let Some(doc) = document else {
        println!("(No document is open, so the change was not applied.)");
        return;
    };

    let prompt = format!("Apply this change to {}?", doc.path().display());
    if !StdinConfirmer::new(input.clone()).confirm(&prompt).await {
        println!("Change discarded.");
        return;
    }

    doc.apply(action);
    match doc.save().await {
        Ok(()) => {
            info!(path = %doc.path().display(), "Applied edit");
            println!("Saved {}.", doc.path().display());
        }
        Err(e) => println!("Could not save {}: {}", doc.path().display(), e),
    }
}
