use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Category, Channel, Intent, Tone};
use crate::domain::{DomainError, ValidationIssue};

/// Longest complaint accepted, counted in characters after trimming.
pub const MAX_TEXT_CHARS: usize = 2000;

/// A validated inbound complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    text: String,
    channel: Option<Channel>,
}

impl ClassificationRequest {
    /// Trim and check the raw payload fields, collecting every failed check.
    pub fn validate(text: &str, channel: Option<&str>) -> Result<Self, DomainError> {
        let mut issues = Vec::new();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            issues.push(ValidationIssue::new("text", "text requerido", "too_small"));
        } else if trimmed.chars().count() > MAX_TEXT_CHARS {
            issues.push(ValidationIssue::new(
                "text",
                "máximo 2000 caracteres",
                "too_big",
            ));
        }

        let channel = match channel {
            None => None,
            Some(tag) => match Channel::from_tag(tag) {
                Some(c) => Some(c),
                None => {
                    issues.push(ValidationIssue::new(
                        "channel",
                        "canal inválido",
                        "invalid_enum_value",
                    ));
                    None
                }
            },
        };

        if !issues.is_empty() {
            return Err(DomainError::Validation(issues));
        }

        Ok(Self {
            text: trimmed.to_string(),
            channel,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn channel(&self) -> Option<Channel> {
        self.channel
    }

    /// The channel to record, `web` when none was given.
    pub fn effective_channel(&self) -> Channel {
        self.channel.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling settings sent with every classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    /// Ask the provider for a JSON object response where supported.
    pub json_response: bool,
}

impl GenerationParams {
    pub const CLASSIFICATION: GenerationParams = GenerationParams {
        temperature: 0.2,
        max_tokens: 256,
        top_p: 0.9,
        presence_penalty: 0.0,
        frequency_penalty: 0.0,
        json_response: true,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::CLASSIFICATION
    }
}

/// Normalized model verdict for one complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    intent: Intent,
    category: Category,
    tone: Tone,
    confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_model_output: Option<Value>,
}

impl ClassificationResult {
    pub fn new(intent: Intent, category: Category, tone: Tone, confidence: f64) -> Self {
        Self {
            intent,
            category,
            tone,
            confidence,
            raw_model_output: None,
        }
    }

    pub fn with_raw_model_output(mut self, raw: Value) -> Self {
        self.raw_model_output = Some(raw);
        self
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn raw_model_output(&self) -> Option<&Value> {
        self.raw_model_output.as_ref()
    }

    pub fn into_raw_model_output(self) -> Option<Value> {
        self.raw_model_output
    }
}
