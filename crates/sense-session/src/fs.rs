//! Workspace file creation and recoverable deletion.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::error::SessionError;

/// File operations against the open workspace.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns true if `name` exists in the workspace.
    async fn exists(&self, name: &str) -> Result<bool, SessionError>;

    /// Create an empty file, failing if it already exists.
    async fn create_empty(&self, name: &str) -> Result<PathBuf, SessionError>;

    /// Move a file to the trash. Returns where it was moved.
    async fn trash(&self, name: &str) -> Result<PathBuf, SessionError>;
}

/// File system rooted at a local workspace folder.
///
/// Deleted files are moved into a trash folder rather than removed.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
    trash_dir: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>, trash_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            trash_dir: trash_dir.into(),
        }
    }

    /// Resolve a workspace-relative name, refusing anything that leaves the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, SessionError> {
        if !self.root.is_dir() {
            return Err(SessionError::NoWorkspace(self.root.display().to_string()));
        }

        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || name.trim().is_empty() {
            return Err(SessionError::OutsideWorkspace(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Create the trash folder with a `.gitignore` so `git add -A` skips it.
    async fn prepare_trash(&self) -> Result<(), SessionError> {
        fs::create_dir_all(&self.trash_dir).await?;
        let ignore = self.trash_dir.join(".gitignore");
        if !fs::try_exists(&ignore).await? {
            fs::write(&ignore, "*\n").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, name: &str) -> Result<bool, SessionError> {
        let path = self.resolve(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn create_empty(&self, name: &str) -> Result<PathBuf, SessionError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => {
                info!(path = %path.display(), "Created file");
                Ok(path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(SessionError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn trash(&self, name: &str) -> Result<PathBuf, SessionError> {
        let path = self.resolve(name)?;
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(SessionError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        self.prepare_trash().await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let target = self
            .trash_dir
            .join(format!("{}-{}", Uuid::new_v4().simple(), file_name));

        fs::rename(&path, &target).await?;
        info!(from = %path.display(), to = %target.display(), "Moved file to trash");
        Ok(target)
    }
}
