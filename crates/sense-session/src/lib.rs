//! Sense Session
//!
//! Per-panel chat sessions on top of `sense-core`. A [`Session`] owns its
//! conversation history and dispatches classified intents either to the
//! synthesizer or to workspace collaborators:
//! - [`FileSystem`] for creating and trashing files
//! - [`SourceControl`] for git status, commit and push
//! - [`Terminal`] for shell commands
//! - [`Confirmer`] for approving side effects before they happen
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sense_session::{AutoDecline, Collaborators, EditorState, Session, SessionConfig};
//!
//! async fn chat() {
//!     let config = SessionConfig::default();
//!     let collaborators = Collaborators::local(&config, Arc::new(AutoDecline));
//!     let mut session = Session::new(config, collaborators);
//!
//!     let reply = session
//!         .handle_message("generate a hello world function", &EditorState::default())
//!         .await;
//!     println!("{}", reply.response.to_markdown());
//!     session.end();
//! }
//! ```

pub mod config;
pub mod confirm;
pub mod error;
pub mod fs;
pub mod git;
pub mod ids;
pub mod panel;
pub mod process;
pub mod session;
pub mod terminal;

// Re-export main types
pub use config::SessionConfig;
pub use confirm::{AutoApprove, AutoDecline, Confirmer};
pub use error::SessionError;
pub use fs::{FileSystem, LocalFileSystem};
pub use git::{GitCli, SourceControl, StatusSummary};
pub use ids::SessionId;
pub use panel::{PanelReply, PanelRequest};
pub use process::CommandOutput;
pub use session::{ActionOutcome, Collaborators, EditorAction, EditorState, Reply, Session};
pub use terminal::{ShellTerminal, Terminal};
