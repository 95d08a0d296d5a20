//! Session configuration.

use std::path::{Path, PathBuf};

use sense_core::DEFAULT_HISTORY_CAPACITY;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Workspace folder file, git and terminal actions run in.
    pub workspace_root: PathBuf,

    /// Maximum number of conversation messages kept.
    pub history_capacity: usize,

    /// Git executable.
    pub git_program: String,

    /// Shell used for terminal commands.
    pub shell: String,

    /// Where deleted files are moved. Relative paths are under the workspace root.
    pub trash_dir: PathBuf,

    /// Pause before replying, in milliseconds.
    pub thinking_delay_ms: u64,

    /// Seed for canned reply selection. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            git_program: "git".to_string(),
            shell: default_shell().to_string(),
            trash_dir: PathBuf::from(".sense-trash"),
            thinking_delay_ms: 0,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Builder method to set the workspace root.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// Builder method to set the history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Builder method to set the reply seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to set the thinking delay.
    pub fn with_thinking_delay_ms(mut self, delay_ms: u64) -> Self {
        self.thinking_delay_ms = delay_ms;
        self
    }

    /// Trash directory resolved against the workspace root.
    pub fn trash_path(&self) -> PathBuf {
        resolve_under(&self.workspace_root, &self.trash_dir)
    }
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn default_shell() -> &'static str {
    if cfg!(windows) {
        "cmd"
    } else {
        "sh"
    }
}
