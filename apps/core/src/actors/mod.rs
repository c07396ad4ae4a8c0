//! # Actor Module
//!
//! Message-passing actors for FloatChat.
//! Each actor owns its I/O resources and is reached through a cloneable
//! handle over an mpsc channel, so callers never share clients or locks.
//!
//! ## Components
//! - `messages`: Message and error types for the actor system
//! - `traits`: Public actor interfaces
//! - `llm`: OpenRouter-backed text generation actor

pub mod llm;
pub mod messages;
pub mod traits;

// Re-export main types for convenience
pub use llm::OpenRouterHandle;
pub use messages::{ActorError, PromptKind};
pub use traits::TextGenerator;
