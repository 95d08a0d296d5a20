//! Open document buffer the terminal front end edits on the user's behalf.

use std::path::{Path, PathBuf};

use sense_session::{EditorAction, EditorState};

/// A document loaded from disk with an optional line selection.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    content: String,
    /// Selected lines, 1-based and inclusive.
    selection: Option<(usize, usize)>,
}

impl Document {
    pub async fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(Self::new(path, content))
    }

    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            selection: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Select lines `start..=end` (1-based).
    pub fn select(&mut self, start: usize, end: usize) -> Result<(), String> {
        let lines = self.line_count();
        if start == 0 || start > end || end > lines {
            return Err(format!(
                "Invalid selection {}-{}: the document has {} lines",
                start, end, lines
            ));
        }
        self.selection = Some((start, end));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection?;
        let lines: Vec<&str> = self.content.split('\n').collect();
        Some(lines[start - 1..end].join("\n"))
    }

    pub fn editor_state(&self) -> EditorState {
        EditorState {
            selected_text: self.selected_text(),
            file_content: Some(self.content.clone()),
        }
    }

    /// Apply a proposed edit to the buffer. The selection is cleared.
    pub fn apply(&mut self, action: &EditorAction) {
        match action {
            EditorAction::ReplaceDocument(text) => {
                self.content = text.clone();
            }
            EditorAction::ReplaceSelection(text) => match self.selection {
                Some((start, end)) => {
                    let lines: Vec<&str> = self.content.split('\n').collect();
                    let mut updated: Vec<&str> = lines[..start - 1].to_vec();
                    updated.push(text);
                    updated.extend_from_slice(&lines[end..]);
                    self.content = updated.join("\n");
                }
                None => self.insert(text),
            },
            EditorAction::InsertAtCursor(text) => self.insert(text),
        }
        self.selection = None;
    }

    /// Insert after the selection, or at the end of the document.
    fn insert(&mut self, text: &str) {
        match self.selection {
            Some((_, end)) => {
                let lines: Vec<&str> = self.content.split('\n').collect();
                let mut updated: Vec<&str> = lines[..end].to_vec();
                updated.push(text);
                updated.extend_from_slice(&lines[end..]);
                self.content = updated.join("\n");
            }
            None => {
                if !self.content.is_empty() && !self.content.ends_with('\n') {
                    self.content.push('\n');
                }
                self.content.push_str(text);
                self.content.push('\n');
            }
        }
    }

    pub async fn save(&self) -> std::io::Result<()> {
        tokio::fs::write(&self.path, &self.content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new("app.js", "const a = 1;\nfunction f(x) { return x; }\nconst b = 2;\n")
    }

    #[test]
    fn test_selected_text() {
        let mut doc = sample();
        assert_eq!(doc.selected_text(), None);
        doc.select(2, 3).unwrap();
        assert_eq!(
            doc.selected_text().as_deref(),
            Some("function f(x) { return x; }\nconst b = 2;")
        );
    }

    #[test]
    fn test_invalid_selection() {
        let mut doc = sample();
        assert!(doc.select(0, 1).is_err());
        assert!(doc.select(3, 2).is_err());
        assert!(doc.select(1, 4).is_err());
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn test_replace_selection_keeps_surrounding_lines() {
        let mut doc = sample();
        doc.select(2, 2).unwrap();
        doc.apply(&EditorAction::ReplaceSelection(
            "const f = (x) => { return x; }".to_string(),
        ));
        assert_eq!(
            doc.content(),
            "const a = 1;\nconst f = (x) => { return x; }\nconst b = 2;\n"
        );
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn test_insert_at_end() {
        let mut doc = Document::new("a.js", "let x;");
        doc.apply(&EditorAction::InsertAtCursor("let y;".to_string()));
        assert_eq!(doc.content(), "let x;\nlet y;\n");
    }

    #[test]
    fn test_insert_after_selection() {
        let mut doc = sample();
        doc.select(1, 1).unwrap();
        doc.apply(&EditorAction::InsertAtCursor("// note".to_string()));
        assert_eq!(
            doc.content(),
            "const a = 1;\n// note\nfunction f(x) { return x; }\nconst b = 2;\n"
        );
    }

    #[tokio::test]
    async fn test_open_and_save() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("main.js");
        std::fs::write(&path, "function main() {}").unwrap();

        let mut doc = Document::open(&path).await.unwrap();
        assert_eq!(doc.editor_state().file_content.as_deref(), Some("function main() {}"));

        doc.apply(&EditorAction::ReplaceDocument("// new\n".to_string()));
        doc.save().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "// new\n");
    }
}
