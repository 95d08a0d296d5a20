//! Source control through the git command line.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::process::{run_captured, CommandOutput};

/// Source-control operations on the workspace's working tree.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Short status of the working tree, including the branch line.
    async fn status(&self) -> Result<String, SessionError>;

    /// Stage every change, including untracked files.
    async fn stage_all(&self) -> Result<(), SessionError>;

    /// Commit staged changes. Returns git's summary output.
    async fn commit(&self, message: &str) -> Result<String, SessionError>;

    /// Push the current branch. Returns git's output.
    async fn push(&self) -> Result<String, SessionError>;
}

/// Runs the git executable in the workspace folder.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    cwd: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput, SessionError> {
        let output = run_captured(&self.program, args, &self.cwd).await?;
        if !output.success() {
            let command = args.join(" ");
            warn!(command = %command, exit_code = ?output.exit_code, "git command failed");
            return Err(SessionError::Git {
                command,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl SourceControl for GitCli {
    async fn status(&self) -> Result<String, SessionError> {
        let output = self.git(&["status", "--short", "--branch"]).await?;
        Ok(output.stdout)
    }

    async fn stage_all(&self) -> Result<(), SessionError> {
        self.git(&["add", "-A"]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<String, SessionError> {
        let output = self.git(&["commit", "-m", message]).await?;
        info!(message, "Committed changes");
        Ok(output.combined())
    }

    async fn push(&self) -> Result<String, SessionError> {
        let output = self.git(&["push"]).await?;
        info!("Pushed changes");
        Ok(output.combined())
    }
}

/// Summary of `git status --short --branch` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    /// Branch line without the leading `## `.
    pub branch: Option<String>,
    /// One entry per changed path, as printed by git.
    pub entries: Vec<String>,
}

impl StatusSummary {
    pub fn parse(output: &str) -> Self {
        let mut branch = None;
        let mut entries = Vec::new();
        for line in output.lines() {
            if let Some(rest) = line.strip_prefix("## ") {
                branch = Some(rest.trim().to_string());
            } else if !line.trim().is_empty() {
                entries.push(line.to_string());
            }
        }
        Self { branch, entries }
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status block shown to the user.
    pub fn render(&self) -> String {
        let mut block = match &self.branch {
            Some(branch) => format!("On branch {}\n", branch),
            None => String::new(),
        };
        if self.is_clean() {
            block.push_str("Working tree clean");
        } else {
            block.push_str(&self.entries.join("\n"));
        }
        block
    }
}
