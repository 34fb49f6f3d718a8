use std::sync::Arc;

use crate::application::CaseRepository;
use crate::domain::{CaseRecord, DomainError, Page, PageRequest};

pub struct ListCasesUseCase {
    case_repo: Arc<dyn CaseRepository>,
}

impl ListCasesUseCase {
    pub fn new(case_repo: Arc<dyn CaseRepository>) -> Self {
        Self { case_repo }
    }

    pub async fn execute(&self, request: PageRequest) -> Result<Page<CaseRecord>, DomainError> {
        self.case_repo.list(request).await
    }
}
