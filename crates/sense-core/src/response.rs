//! Display payload returned by the synthesizer.

use serde::{Deserialize, Serialize};

use crate::code::fence;

/// Text to show the user, optionally with a code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Human-readable reply.
    pub speech: String,
    /// Code to render as a fenced block under the speech.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Response {
    /// A reply with speech only.
    pub fn speech(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            code: None,
        }
    }

    /// A reply with speech and an attached code block.
    pub fn with_code(speech: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            code: Some(code.into()),
        }
    }

    /// Render as markdown: the speech, then the code fenced.
    pub fn to_markdown(&self) -> String {
        match &self.code {
            Some(code) => format!("{}\n\n{}", self.speech, fence(code)),
            None => self.speech.clone(),
        }
    }
}
