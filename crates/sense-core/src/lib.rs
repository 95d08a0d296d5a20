//! Sense Core
//!
//! Maps free-form chat messages from an editor panel to coding intents and
//! synthesizes canned replies for them. This crate has no dependencies on:
//! - File system or process access
//! - An async runtime
//! - Any language model
//!
//! Both entry points are synchronous and total: [`classify`] always yields an
//! [`Intent`] and [`Synthesizer::respond`] always yields a [`Response`].

pub mod chat;
pub mod classifier;
pub mod code;
pub mod completion;
pub mod intent;
pub mod response;
pub mod synthesizer;
pub mod templates;

// Re-export commonly used types
pub use chat::{ConversationMessage, History, Sender, DEFAULT_HISTORY_CAPACITY};
pub use classifier::{classify, classify_with_rule};
pub use completion::{complete, CompletionItem, CompletionKind};
pub use intent::{Intent, RequestContext};
pub use response::Response;
pub use synthesizer::{AuxiliaryContext, Request, Synthesizer};
