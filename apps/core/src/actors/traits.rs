use crate::actors::messages::{AppError, PromptKind};
use async_trait::async_trait;

/// Defines the public interface for a text generation actor.
///
/// This trait abstracts the specific model backend, allowing different
/// implementations (e.g., remote OpenRouter API, a local stub for tests)
/// to be used interchangeably.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Generates a complete text response for a user query, optionally
    /// grounded in dataset statistics.
    async fn generate_response(
        &self,
        query: String,
        data_context: Option<String>,
        kind: PromptKind,
    ) -> Result<String, AppError>;
}
