use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::application::CrmService;
use crate::domain::{CrmInput, CrmOutcome, DomainError};

/// Open case id the mock CRM reports for duplicates.
pub const MOCK_OPEN_CASE_ID: &str = "AND-20250101-12345";

/// Stand-in CRM with randomized answers.
///
/// Anyone mentioning an order (`pedido`) is a customer; everyone else is a
/// customer 80% of the time. About 15% of registrations report an existing
/// open case.
pub struct MockCrm {
    rng: Mutex<StdRng>,
}

impl MockCrm {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockCrm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrmService for MockCrm {
    async fn validate_and_register(&self, input: &CrmInput) -> Result<CrmOutcome, DomainError> {
        let (customer_draw, duplicate_draw): (f64, f64) = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| DomainError::internal("mock CRM rng lock poisoned"))?;
            (rng.gen(), rng.gen())
        };

        let is_customer = input.text.to_lowercase().contains("pedido") || customer_draw > 0.2;
        let existing_open_case_id = (duplicate_draw > 0.85).then(|| MOCK_OPEN_CASE_ID.to_string());

        let outcome = CrmOutcome::new(is_customer, existing_open_case_id);
        debug!(
            "MockCrm: registered {} case (customer={}, status={})",
            input.intent, outcome.is_customer, outcome.status
        );
        Ok(outcome)
    }
}
