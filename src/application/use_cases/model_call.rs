use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{DomainError, GenerationParams, PromptMessage};

/// Hard wall-clock limit for a single model call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);
/// Extra attempts allowed after a retryable transport failure.
pub const MAX_API_RETRIES: u32 = 1;

/// Runs one model call under a timeout, retrying transient transport
/// failures a bounded number of times.
///
/// A timed-out call is dropped (which aborts its in-flight request) and
/// reported as a status-less transport error, so it is retried like a
/// connection failure. Client-side errors and configuration errors are
/// returned on the first occurrence.
pub struct ModelCallExecutor {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
    timeout: Duration,
    max_retries: u32,
}

impl ModelCallExecutor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            params: GenerationParams::CLASSIFICATION,
            timeout: REQUEST_TIMEOUT,
            max_retries: MAX_API_RETRIES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub async fn execute(&self, messages: &[PromptMessage]) -> Result<String, DomainError> {
        let mut attempt = 0;
        loop {
            let outcome =
                match tokio::time::timeout(self.timeout, self.client.complete(messages, &self.params))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(DomainError::transport(
                        None,
                        format!("model call timed out after {} ms", self.timeout.as_millis()),
                    )),
                };

            match outcome {
                Ok(text) => {
                    debug!("Model call succeeded on attempt {}", attempt);
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let status = match &e {
                        DomainError::Transport { status, .. } => *status,
                        _ => None,
                    };
                    warn!(attempt, ?status, "Model request failed, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::ScriptedCompletionClient;
    use crate::domain::build_messages;

    fn messages() -> [PromptMessage; 2] {
        build_messages("Quiero cancelar", None)
    }

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let client = Arc::new(ScriptedCompletionClient::new().then_ok("{}"));
        let executor = ModelCallExecutor::new(client.clone());

        assert_eq!(executor.execute(&messages()).await.unwrap(), "{}");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn retries_once_on_server_error() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_err(DomainError::transport(Some(503), "unavailable"))
                .then_ok("ok"),
        );
        let executor = ModelCallExecutor::new(client.clone());

        assert_eq!(executor.execute(&messages()).await.unwrap(), "ok");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn two_server_errors_exhaust_the_budget() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_err(DomainError::transport(Some(500), "boom"))
                .then_err(DomainError::transport(Some(500), "boom again"))
                .then_ok("never reached"),
        );
        let executor = ModelCallExecutor::new(client.clone());

        let err = executor.execute(&messages()).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { status: Some(500), .. }));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn client_errors_propagate_immediately() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_err(DomainError::transport(Some(400), "bad request"))
                .then_ok("never reached"),
        );
        let executor = ModelCallExecutor::new(client.clone());

        let err = executor.execute(&messages()).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { status: Some(400), .. }));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn configuration_errors_are_not_retried() {
        let client = Arc::new(
            ScriptedCompletionClient::new().then_err(DomainError::configuration("no key")),
        );
        let executor = ModelCallExecutor::new(client.clone());

        assert!(executor.execute(&messages()).await.unwrap_err().is_configuration());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn timeouts_count_as_retryable_failures() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_delay(Duration::from_secs(5), "too late")
                .then_ok("in time"),
        );
        let executor = ModelCallExecutor::new(client.clone()).with_timeout(Duration::from_millis(50));

        assert_eq!(executor.execute(&messages()).await.unwrap(), "in time");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn repeated_timeouts_surface_as_transport_error() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_delay(Duration::from_secs(5), "late")
                .then_delay(Duration::from_secs(5), "late"),
        );
        let executor = ModelCallExecutor::new(client.clone()).with_timeout(Duration::from_millis(20));

        let err = executor.execute(&messages()).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { status: None, .. }));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn zero_retry_budget_makes_a_single_call() {
        let client = Arc::new(
            ScriptedCompletionClient::new().then_err(DomainError::transport(None, "reset")),
        );
        let executor = ModelCallExecutor::new(client.clone()).with_max_retries(0);

        assert!(executor.execute(&messages()).await.unwrap_err().is_transport());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_fires_at_twelve_seconds() {
        let client = Arc::new(
            ScriptedCompletionClient::new().then_delay(REQUEST_TIMEOUT * 2, "late"),
        );
        let executor = ModelCallExecutor::new(client.clone()).with_max_retries(0);

        let started = tokio::time::Instant::now();
        let err = executor.execute(&messages()).await.unwrap_err();

        assert_eq!(started.elapsed(), REQUEST_TIMEOUT);
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(12));
        assert!(matches!(err, DomainError::Transport { status: None, .. }));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_lets_slow_answers_under_the_limit_through() {
        let client = Arc::new(ScriptedCompletionClient::new().then_delay(
            REQUEST_TIMEOUT - Duration::from_millis(1),
            "just in time",
        ));
        let executor = ModelCallExecutor::new(client.clone());

        assert_eq!(executor.execute(&messages()).await.unwrap(), "just in time");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_budget_times_out_twice_before_failing() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_delay(REQUEST_TIMEOUT * 2, "late")
                .then_delay(REQUEST_TIMEOUT * 2, "late"),
        );
        let executor = ModelCallExecutor::new(client.clone());

        let started = tokio::time::Instant::now();
        assert!(executor.execute(&messages()).await.unwrap_err().is_transport());
        assert_eq!(started.elapsed(), REQUEST_TIMEOUT * 2);
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn uses_classification_sampling_settings() {
        let executor = ModelCallExecutor::new(Arc::new(ScriptedCompletionClient::new()));
        assert_eq!(*executor.params(), GenerationParams::CLASSIFICATION);
        assert_eq!(executor.params().max_tokens, 256);
    }
}
