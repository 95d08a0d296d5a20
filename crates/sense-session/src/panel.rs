//! JSON messages exchanged with a chat panel, one object per line.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::{ActionOutcome, EditorAction, EditorState, Reply};

/// Message sent by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelRequest {
    /// The user typed a message.
    UserMessage {
        text: String,
        #[serde(default, rename = "selectedText")]
        selected_text: Option<String>,
        #[serde(default, rename = "fileContent")]
        file_content: Option<String>,
    },
    /// The user asked to start the conversation over.
    ClearHistory,
}

impl PanelRequest {
    pub fn decode(line: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Editor state carried by a user message.
    pub fn editor_state(&self) -> EditorState {
        match self {
            Self::UserMessage {
                selected_text,
                file_content,
                ..
            } => EditorState {
                selected_text: selected_text.clone(),
                file_content: file_content.clone(),
            },
            Self::ClearHistory => EditorState::default(),
        }
    }
}

/// Message sent back to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelReply {
    /// Assistant reply to a user message.
    AiResponse {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<EditorAction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outcome: Option<ActionOutcome>,
    },
    /// The history was cleared.
    Cleared,
    /// The request could not be understood.
    Error { message: String },
}

impl PanelReply {
    pub fn encode(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Reply> for PanelReply {
    fn from(reply: Reply) -> Self {
        Self::AiResponse {
            text: reply.response.speech,
            code: reply.response.code,
            action: reply.action,
            outcome: reply.outcome,
        }
    }
}
