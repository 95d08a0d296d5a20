//! User confirmation for side-effecting actions.

use async_trait::async_trait;
use tracing::trace;

/// Asks the user whether a side-effecting action may proceed.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns true if the user approved the action described by `prompt`.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmer that approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Confirmer for AutoApprove {
    async fn confirm(&self, prompt: &str) -> bool {
        trace!(prompt, "Auto-approving action");
        true
    }
}

/// Confirmer that cancels everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;

#[async_trait]
impl Confirmer for AutoDecline {
    async fn confirm(&self, prompt: &str) -> bool {
        trace!(prompt, "Declining action");
        false
    }
}
