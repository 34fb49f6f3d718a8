use async_trait::async_trait;

use crate::domain::{CaseRecord, DomainError, Page, PageRequest};

/// Persistence for classified cases, in arrival order.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    async fn save(&self, record: &CaseRecord) -> Result<(), DomainError>;

    async fn list(&self, request: PageRequest) -> Result<Page<CaseRecord>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn clear(&self) -> Result<(), DomainError>;
}
