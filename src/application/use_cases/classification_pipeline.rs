use tracing::{debug, warn};

use crate::application::ModelCallExecutor;
use crate::domain::{
    build_messages, parse_model_response, sanitize_text, Channel, ClassificationResult,
    DomainError,
};

/// Extra whole-call attempts allowed when the model answer is not JSON.
pub const MAX_PARSE_RETRIES: u32 = 1;

/// Sanitize → prompt → call → extract → normalize, with a bounded retry of
/// the whole call when the answer cannot be parsed.
///
/// The parse-level retry counter is independent from the transport-level one
/// kept by [`ModelCallExecutor`]; a transport failure that survives the
/// executor ends the classification immediately.
pub struct ClassificationPipeline {
    executor: ModelCallExecutor,
    max_parse_retries: u32,
}

impl ClassificationPipeline {
    pub fn new(executor: ModelCallExecutor) -> Self {
        Self {
            executor,
            max_parse_retries: MAX_PARSE_RETRIES,
        }
    }

    pub fn with_max_parse_retries(mut self, max_parse_retries: u32) -> Self {
        self.max_parse_retries = max_parse_retries;
        self
    }

    /// Classify one complaint.
    ///
    /// `include_raw_output` attaches the parsed model JSON to the result; the
    /// caller decides this from its deployment environment.
    pub async fn classify(
        &self,
        text: &str,
        channel: Option<Channel>,
        include_raw_output: bool,
    ) -> Result<ClassificationResult, DomainError> {
        let sanitized = sanitize_text(text);
        let messages = build_messages(&sanitized, channel);

        let mut attempt = 0;
        loop {
            let raw = self.executor.execute(&messages).await?;

            match parse_model_response(&raw, include_raw_output) {
                Ok(result) => {
                    debug!(
                        "Classified as intent={} category={} tone={} confidence={:.2}",
                        result.intent(),
                        result.category(),
                        result.tone(),
                        result.confidence()
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!(attempt, raw_content = %raw, "Failed to parse model response as JSON");
                    if attempt >= self.max_parse_retries {
                        return Err(DomainError::parse(
                            format!(
                                "Unable to parse model response after {} attempt(s): {}",
                                attempt + 1,
                                e
                            ),
                            raw,
                        ));
                    }
                    attempt += 1;
                }
            }
        }
    }
}
