use async_trait::async_trait;

use crate::domain::{CrmInput, CrmOutcome, DomainError};

/// Customer lookup and case registration in the CRM.
#[async_trait]
pub trait CrmService: Send + Sync {
    async fn validate_and_register(&self, input: &CrmInput) -> Result<CrmOutcome, DomainError>;
}
