use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Category, Channel, ClassificationResult, Intent, Tone};

/// Outcome of registering a case with the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrmStatus {
    Registered,
    DuplicateFound,
}

impl CrmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrmStatus::Registered => "REGISTERED",
            CrmStatus::DuplicateFound => "DUPLICATE_FOUND",
        }
    }
}

impl std::fmt::Display for CrmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmOutcome {
    pub is_customer: bool,
    pub existing_open_case_id: Option<String>,
    pub status: CrmStatus,
}

impl CrmOutcome {
    /// Status is derived from whether an open case already exists.
    pub fn new(is_customer: bool, existing_open_case_id: Option<String>) -> Self {
        let status = if existing_open_case_id.is_some() {
            CrmStatus::DuplicateFound
        } else {
            CrmStatus::Registered
        };
        Self {
            is_customer,
            existing_open_case_id,
            status,
        }
    }
}

/// What the CRM needs to know about a freshly classified complaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrmInput {
    pub text: String,
    pub intent: Intent,
    pub category: Category,
    pub tone: Tone,
    pub confidence: f64,
    pub channel: Option<Channel>,
}

/// A case as kept in the case store and written to the case log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub case_id: String,
    pub text: String,
    pub channel: Channel,
    pub intent: Intent,
    pub category: Category,
    pub tone: Tone,
    pub confidence: f64,
    pub received_at: String,
    pub crm_status: CrmStatus,
    pub crm_existing_open_case_id: Option<String>,
    pub is_customer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<Value>,
}

/// Response payload for a classified and registered complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCase {
    pub intent: Intent,
    pub category: Category,
    pub tone: Tone,
    pub confidence: f64,
    pub case_id: String,
    pub received_at: String,
    pub channel: Channel,
    pub crm: CrmOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<Value>,
}

impl ClassifiedCase {
    pub fn new(
        result: ClassificationResult,
        case_id: String,
        received_at: String,
        channel: Channel,
        crm: CrmOutcome,
    ) -> Self {
        Self {
            intent: result.intent(),
            category: result.category(),
            tone: result.tone(),
            confidence: result.confidence(),
            case_id,
            received_at,
            channel,
            crm,
            raw_model_output: result.into_raw_model_output(),
        }
    }

    pub fn to_record(&self, text: String) -> CaseRecord {
        CaseRecord {
            case_id: self.case_id.clone(),
            text,
            channel: self.channel,
            intent: self.intent,
            category: self.category,
            tone: self.tone,
            confidence: self.confidence,
            received_at: self.received_at.clone(),
            crm_status: self.crm.status,
            crm_existing_open_case_id: self.crm.existing_open_case_id.clone(),
            is_customer: self.crm.is_customer,
            raw_model_output: self.raw_model_output.clone(),
        }
    }
}

/// Build a case id of the form `AND-YYYYMMDD-NNNNN` for the given instant.
pub fn generate_case_id(at: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(10000..=99999);
    format!("AND-{}-{suffix}", at.format("%Y%m%d"))
}

pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
