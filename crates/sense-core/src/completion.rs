//! Inline completion suggestions for the text before the cursor.

use serde::{Deserialize, Serialize};

/// What kind of entry a completion item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    Snippet,
}

/// A single completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    /// Label shown in the completion list.
    pub label: String,
    /// Text inserted, in snippet syntax (`${1:placeholder}`).
    pub insert_text: String,
    /// Markdown documentation shown next to the item.
    pub documentation: String,
    pub kind: CompletionKind,
}

/// Suggestions for a line whose text before the cursor is `line_prefix`.
pub fn complete(line_prefix: &str) -> Vec<CompletionItem> {
    if !line_prefix.ends_with("log") {
        return Vec::new();
    }

    vec![CompletionItem {
        label: "console.log".to_string(),
        insert_text: "console.log(${1:message});".to_string(),
        documentation: "Inserts a `console.log` statement.".to_string(),
        kind: CompletionKind::Snippet,
    }]
}
