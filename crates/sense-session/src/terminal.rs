//! Shell command execution for terminal intents.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::SessionError;
use crate::process::{run_captured, CommandOutput};

/// Runs command lines on behalf of the user.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Run `command` verbatim and wait for it to finish.
    async fn run(&self, command: &str) -> Result<CommandOutput, SessionError>;
}

/// Runs commands through a shell in the workspace folder.
#[derive(Debug, Clone)]
pub struct ShellTerminal {
    shell: String,
    cwd: PathBuf,
}

impl ShellTerminal {
    pub fn new(shell: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
            cwd: cwd.into(),
        }
    }

    fn command_flag(&self) -> &'static str {
        let name = self.shell.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
        if name.eq_ignore_ascii_case("cmd") || name.eq_ignore_ascii_case("cmd.exe") {
            "/C"
        } else {
            "-c"
        }
    }
}

#[async_trait]
impl Terminal for ShellTerminal {
    async fn run(&self, command: &str) -> Result<CommandOutput, SessionError> {
        info!(shell = %self.shell, command, "Running terminal command");
        run_captured(&self.shell, &[self.command_flag(), command], &self.cwd)
            .await
            .map_err(|e| SessionError::Terminal(format!("{}: {}", self.shell, e)))
    }
}
