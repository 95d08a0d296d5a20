//! Intent types produced by the classifier.

use serde::{Deserialize, Serialize};

use crate::chat::History;

/// The action a user message asks for.
///
/// Exactly one variant is produced per message; `Chat` is the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    /// Rewrite a piece of code according to an instruction.
    Refactor { instruction: String, code: String },
    /// Explain a piece of code.
    Explain { code: String },
    /// Generate new code from a description.
    Generate { description: String },
    /// Insert a snippet at the cursor.
    InsertCode { description: String },
    /// Rewrite the whole open document.
    EditFile {
        instruction: String,
        #[serde(rename = "fileContent")]
        file_content: String,
    },
    /// Create an empty file in the workspace.
    CreateFile { filename: String },
    /// Move a workspace file to the trash.
    DeleteFile { filename: String },
    /// Show the working tree status.
    GitStatus,
    /// Stage everything and commit with a message.
    GitCommit { message: String },
    /// Push the current branch.
    GitPush,
    /// Run a shell command in the terminal.
    RunInTerminal { command: String },
    /// Plain conversation.
    Chat { message: String },
}

impl Intent {
    /// Short tag naming the variant, as used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Refactor { .. } => "refactor",
            Self::Explain { .. } => "explain",
            Self::Generate { .. } => "generate",
            Self::InsertCode { .. } => "insertCode",
            Self::EditFile { .. } => "editFile",
            Self::CreateFile { .. } => "createFile",
            Self::DeleteFile { .. } => "deleteFile",
            Self::GitStatus => "gitStatus",
            Self::GitCommit { .. } => "gitCommit",
            Self::GitPush => "gitPush",
            Self::RunInTerminal { .. } => "runInTerminal",
            Self::Chat { .. } => "chat",
        }
    }

    /// Returns true if acting on this intent has side effects that need
    /// the user's confirmation first.
    pub fn requires_confirmation(&self) -> bool {
        matches!(
            self,
            Self::DeleteFile { .. }
                | Self::GitCommit { .. }
                | Self::GitPush
                | Self::RunInTerminal { .. }
        )
    }
}

/// Editor and conversation state available while classifying one message.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    /// Text currently selected in the editor.
    pub selected_text: Option<&'a str>,
    /// Full text of the active document.
    pub file_content: Option<&'a str>,
    /// Conversation so far.
    pub history: Option<&'a History>,
}

impl<'a> RequestContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, selected_text: &'a str) -> Self {
        self.selected_text = Some(selected_text);
        self
    }

    pub fn with_file_content(mut self, file_content: &'a str) -> Self {
        self.file_content = Some(file_content);
        self
    }

    pub fn with_history(mut self, history: &'a History) -> Self {
        self.history = Some(history);
        self
    }

    /// The selection, if it holds anything other than whitespace.
    pub fn selection(&self) -> Option<&'a str> {
        self.selected_text.filter(|s| !s.trim().is_empty())
    }
}
