use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::CompletionClient;
use crate::domain::{DomainError, GenerationParams, PromptMessage};

enum Step {
    Respond(String),
    Fail(DomainError),
    Delay(Duration, String),
}

/// A [`CompletionClient`] that replays a fixed script of outcomes, one per
/// call, and records what it was asked.
///
/// Test-only: it backs the unit tests and the `tests/` integration suite,
/// driving the retry paths of the pipeline without a network. It is never
/// wired into the container or selectable from the CLI (use `--mock-model`
/// for an offline run). Once the script runs out every further call fails
/// with an internal error.
pub struct ScriptedCompletionClient {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<PromptMessage>>,
}

impl ScriptedCompletionClient {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.push(Step::Respond(text.into()))
    }

    pub fn then_err(self, error: DomainError) -> Self {
        self.push(Step::Fail(error))
    }

    /// Answer with `text` only after sleeping for `delay`.
    pub fn then_delay(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(Step::Delay(delay, text.into()))
    }

    fn push(self, step: Step) -> Self {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(step);
        }
        self
    }

    /// Number of calls received so far, including ones that timed out.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<PromptMessage> {
        self.last_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Default for ScriptedCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        _params: &GenerationParams,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_messages.lock() {
            *last = messages.to_vec();
        }

        let step = self
            .steps
            .lock()
            .map_err(|_| DomainError::internal("completion script lock poisoned"))?
            .pop_front();

        match step {
            Some(Step::Respond(text)) => Ok(text),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Delay(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(DomainError::internal("completion script exhausted")),
        }
    }
}
