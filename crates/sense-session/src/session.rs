//! Per-panel chat sessions.
//!
//! A session owns the conversation history and the collaborators that act on
//! the workspace. Each message is classified, dispatched, and answered; the
//! exchange is then appended to the history. Collaborator failures become
//! reply text, so handling a message never fails.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sense_core::{
    classify_with_rule, AuxiliaryContext, ConversationMessage, History, Intent, Request,
    RequestContext, Response, Synthesizer,
};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::confirm::Confirmer;
use crate::error::SessionError;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::git::{GitCli, SourceControl, StatusSummary};
use crate::ids::SessionId;
use crate::terminal::{ShellTerminal, Terminal};

const UNCHANGED_CODE: &str =
    "I'm sorry, I don't know how to perform that refactoring yet. Try 'add comments' or 'convert to arrow function'.";
const UNCHANGED_FILE: &str =
    "I'm sorry, I don't know how to make that change to the file yet. Try 'add jsdoc to this file'.";
const NO_OPEN_FILE: &str = "There's no open file to edit. Open a file and try again.";

/// Editor state captured when the user sends a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    /// Text selected in the active editor.
    pub selected_text: Option<String>,
    /// Full text of the active document.
    pub file_content: Option<String>,
}

impl EditorState {
    fn selection(&self) -> Option<&str> {
        self.selected_text
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Change the presentation surface should apply to the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum EditorAction {
    /// Replace the current selection.
    ReplaceSelection(String),
    /// Replace the whole document.
    ReplaceDocument(String),
    /// Insert at the cursor.
    InsertAtCursor(String),
}

/// Result of a file, git or terminal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionOutcome {
    Succeeded,
    /// The user declined the confirmation; nothing was run.
    Cancelled,
    Failed,
}

/// Everything produced for one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// How the message was classified.
    pub intent: Intent,
    /// What to show the user.
    pub response: Response,
    /// Proposed document change, if any.
    pub action: Option<EditorAction>,
    /// Outcome of a workspace action, if one was attempted.
    pub outcome: Option<ActionOutcome>,
}

impl Reply {
    fn show(intent: Intent, response: Response) -> Self {
        Self {
            intent,
            response,
            action: None,
            outcome: None,
        }
    }

    fn edit(intent: Intent, response: Response, action: Option<EditorAction>) -> Self {
        Self {
            intent,
            response,
            action,
            outcome: None,
        }
    }

    fn outcome(intent: Intent, response: Response, outcome: ActionOutcome) -> Self {
        Self {
            intent,
            response,
            action: None,
            outcome: Some(outcome),
        }
    }
}

/// Workspace collaborators a session dispatches to.
#[derive(Clone)]
pub struct Collaborators {
    pub files: Arc<dyn FileSystem>,
    pub git: Arc<dyn SourceControl>,
    pub terminal: Arc<dyn Terminal>,
    pub confirmer: Arc<dyn Confirmer>,
}

impl Collaborators {
    /// Local file system, git CLI and shell for the configured workspace.
    pub fn local(config: &SessionConfig, confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            files: Arc::new(LocalFileSystem::new(
                config.workspace_root.clone(),
                config.trash_path(),
            )),
            git: Arc::new(GitCli::new(
                config.git_program.clone(),
                config.workspace_root.clone(),
            )),
            terminal: Arc::new(ShellTerminal::new(
                config.shell.clone(),
                config.workspace_root.clone(),
            )),
            confirmer,
        }
    }
}

/// A chat session bound to one panel.
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    history: History,
    synthesizer: Synthesizer,
    collaborators: Collaborators,
}

impl Session {
    /// Create a session with an empty history.
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let synthesizer = match config.seed {
            Some(seed) => Synthesizer::seeded(seed),
            None => Synthesizer::new(),
        };
        let id = SessionId::generate();
        info!(session_id = %id, workspace = %config.workspace_root.display(), "Session started");

        Self {
            id,
            history: History::with_capacity(config.history_capacity),
            config,
            synthesizer,
            collaborators,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Forget the conversation so far.
    pub fn clear(&mut self) {
        debug!(session_id = %self.id, "Clearing history");
        self.history.clear();
    }

    /// Tear the session down, discarding its history.
    pub fn end(mut self) {
        self.history.clear();
        info!(session_id = %self.id, "Session ended");
    }

    /// Classify a message, act on it, and record the exchange.
    pub async fn handle_message(&mut self, message: &str, editor: &EditorState) -> Reply {
        let (intent, rule) = {
            let context = RequestContext {
                selected_text: editor.selected_text.as_deref(),
                file_content: editor.file_content.as_deref(),
                history: Some(&self.history),
            };
            classify_with_rule(message, &context)
        };
        info!(session_id = %self.id, rule, intent = intent.kind(), "Handling message");

        self.history.push(ConversationMessage::user(message));

        if self.config.thinking_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.thinking_delay_ms)).await;
        }

        let reply = self.dispatch(intent, editor).await;
        self.history
            .push(ConversationMessage::assistant(reply.response.to_markdown()));
        reply
    }

    async fn dispatch(&mut self, intent: Intent, editor: &EditorState) -> Reply {
        if intent.requires_confirmation() {
            let prompt = confirmation_prompt(&intent);
            if !self.collaborators.confirmer.confirm(&prompt).await {
                info!(session_id = %self.id, intent = intent.kind(), "Action cancelled by user");
                return Reply::outcome(intent, Response::speech("Cancelled."), ActionOutcome::Cancelled);
            }
        }

        match &intent {
            Intent::CreateFile { filename } => {
                let result = self.create_file(filename).await;
                self.finish_action(intent, result)
            }
            Intent::DeleteFile { filename } => {
                let result = self.delete_file(filename).await;
                self.finish_action(intent, result)
            }
            Intent::GitStatus => {
                let result = self.git_status().await;
                self.finish_action(intent, result)
            }
            Intent::GitCommit { message } => {
                let result = self.git_commit(message).await;
                self.finish_action(intent, result)
            }
            Intent::GitPush => {
                let result = self.git_push().await;
                self.finish_action(intent, result)
            }
            Intent::RunInTerminal { command } => {
                let result = self.run_in_terminal(command).await;
                self.finish_action(intent, result)
            }
            Intent::Refactor { instruction, code } => {
                let rewritten = self.synthesizer.respond_to(
                    Request::Refactor {
                        instruction: instruction.as_str(),
                        code: code.as_str(),
                    },
                    None,
                );
                if rewritten.speech == *code {
                    return Reply::show(intent, Response::speech(UNCHANGED_CODE));
                }
                let action = (editor.selection() == Some(code.as_str()))
                    .then(|| EditorAction::ReplaceSelection(rewritten.speech.clone()));
                let response = Response::with_code("Here is the refactored code:", rewritten.speech);
                Reply::edit(intent, response, action)
            }
            Intent::EditFile {
                instruction,
                file_content,
            } => {
                if editor.file_content.is_none() {
                    return Reply::show(intent, Response::speech(NO_OPEN_FILE));
                }
                let rewritten = self.synthesizer.respond_to(
                    Request::EditFile {
                        instruction: instruction.as_str(),
                        body: file_content.as_str(),
                    },
                    None,
                );
                if rewritten.speech == *file_content {
                    return Reply::show(intent, Response::speech(UNCHANGED_FILE));
                }
                let action = EditorAction::ReplaceDocument(rewritten.speech.clone());
                let response = Response::with_code("I've updated the file:", rewritten.speech);
                Reply::edit(intent, response, Some(action))
            }
            Intent::InsertCode { description } => {
                let response = self.synthesizer.respond_to(
                    Request::InsertCode {
                        description: description.as_str(),
                    },
                    None,
                );
                let action = response.code.clone().map(EditorAction::InsertAtCursor);
                Reply::edit(intent, response, action)
            }
            Intent::Explain { code } => {
                let response = self
                    .synthesizer
                    .respond_to(Request::Explain { code: code.as_str() }, None);
                Reply::show(intent, response)
            }
            Intent::Generate { description } => {
                let response = self.synthesizer.respond_to(
                    Request::Generate {
                        description: description.as_str(),
                    },
                    None,
                );
                Reply::show(intent, response)
            }
            Intent::Chat { message } => {
                let context = AuxiliaryContext {
                    file_content: editor.file_content.as_deref(),
                    history: Some(&self.history),
                };
                let response = self
                    .synthesizer
                    .respond_to(Request::Conversation(message.as_str()), Some(&context));
                Reply::show(intent, response)
            }
        }
    }

    fn finish_action(&self, intent: Intent, result: Result<Response, SessionError>) -> Reply {
        match result {
            Ok(response) => Reply::outcome(intent, response, ActionOutcome::Succeeded),
            Err(e) => {
                warn!(session_id = %self.id, intent = intent.kind(), error = %e, "Action failed");
                Reply::outcome(
                    intent,
                    Response::speech(format!("Error: {}", e)),
                    ActionOutcome::Failed,
                )
            }
        }
    }

    async fn create_file(&self, filename: &str) -> Result<Response, SessionError> {
        let files = &self.collaborators.files;
        if files.exists(filename).await? {
            return Err(SessionError::AlreadyExists(filename.to_string()));
        }
        files.create_empty(filename).await?;
        Ok(Response::speech(format!("Created file '{}'.", filename)))
    }

    async fn delete_file(&self, filename: &str) -> Result<Response, SessionError> {
        let files = &self.collaborators.files;
        if !files.exists(filename).await? {
            return Err(SessionError::NotFound(filename.to_string()));
        }
        files.trash(filename).await?;
        Ok(Response::speech(format!("Moved '{}' to the trash.", filename)))
    }

    async fn git_status(&self) -> Result<Response, SessionError> {
        let summary = StatusSummary::parse(&self.collaborators.git.status().await?);
        Ok(Response::with_code("Here's the current git status:", summary.render()))
    }

    async fn git_commit(&self, message: &str) -> Result<Response, SessionError> {
        let git = &self.collaborators.git;
        git.stage_all().await?;
        let output = git.commit(message).await?;
        Ok(with_output(
            format!("Committed all changes with message \"{}\".", message),
            output,
        ))
    }

    async fn git_push(&self) -> Result<Response, SessionError> {
        let output = self.collaborators.git.push().await?;
        Ok(with_output("Pushed your changes.".to_string(), output))
    }

    async fn run_in_terminal(&self, command: &str) -> Result<Response, SessionError> {
        let output = self.collaborators.terminal.run(command).await?;
        let speech = match output.exit_code {
            Some(code) => format!("Ran `{}` (exit code {}).", command, code),
            None => format!("Ran `{}`; it was terminated by a signal.", command),
        };
        Ok(with_output(speech, output.combined()))
    }
}

fn with_output(speech: String, output: String) -> Response {
    let output = output.trim();
    if output.is_empty() {
        Response::speech(speech)
    } else {
        Response::with_code(speech, output)
    }
}

fn confirmation_prompt(intent: &Intent) -> String {
    match intent {
        Intent::DeleteFile { filename } => format!("Move '{}' to the trash?", filename),
        Intent::GitCommit { message } => {
            format!("Stage all changes and commit with message \"{}\"?", message)
        }
        Intent::GitPush => "Push the current branch to its remote?".to_string(),
        Intent::RunInTerminal { command } => format!("Run `{}` in the terminal?", command),
        other => format!("Proceed with {}?", other.kind()),
    }
}
