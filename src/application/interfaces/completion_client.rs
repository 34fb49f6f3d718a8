use async_trait::async_trait;

use crate::domain::{DomainError, GenerationParams, PromptMessage};

/// Sends one chat-style prompt to a language model and returns the text of
/// its first answer.
///
/// Implementors own transport, authentication and vendor-specific payload
/// shapes. A single call makes at most one network request; timeouts and
/// retries are layered on top by [`crate::application::ModelCallExecutor`].
///
/// Failures must be reported as [`DomainError::Transport`] carrying the HTTP
/// status when the server answered, or as [`DomainError::Configuration`] when
/// the client cannot be used at all.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        params: &GenerationParams,
    ) -> Result<String, DomainError>;
}
