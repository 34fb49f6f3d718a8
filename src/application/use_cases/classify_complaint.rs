use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::application::{CaseRepository, ClassificationPipeline, CrmService};
use crate::domain::{
    generate_case_id, sanitize_for_persistence, ClassificationRequest, ClassifiedCase, CrmInput,
    DomainError,
};

/// Classifies a complaint, registers it with the CRM and stores the case.
pub struct ClassifyComplaintUseCase {
    pipeline: Arc<ClassificationPipeline>,
    crm: Arc<dyn CrmService>,
    case_repo: Arc<dyn CaseRepository>,
    expose_raw_output: bool,
}

impl ClassifyComplaintUseCase {
    pub fn new(
        pipeline: Arc<ClassificationPipeline>,
        crm: Arc<dyn CrmService>,
        case_repo: Arc<dyn CaseRepository>,
    ) -> Self {
        Self {
            pipeline,
            crm,
            case_repo,
            expose_raw_output: false,
        }
    }

    /// Keep the parsed model output on the response and the stored case.
    /// Enable outside production only.
    pub fn with_raw_output(mut self, expose: bool) -> Self {
        self.expose_raw_output = expose;
        self
    }

    pub async fn execute(&self, request: &ClassificationRequest) -> Result<ClassifiedCase, DomainError> {
        let result = self
            .pipeline
            .classify(request.text(), request.channel(), self.expose_raw_output)
            .await?;

        let now = Utc::now();
        let case_id = generate_case_id(now);
        let received_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let crm = self
            .crm
            .validate_and_register(&CrmInput {
                text: request.text().to_string(),
                intent: result.intent(),
                category: result.category(),
                tone: result.tone(),
                confidence: result.confidence(),
                channel: request.channel(),
            })
            .await?;

        let classified = ClassifiedCase::new(
            result,
            case_id,
            received_at,
            request.effective_channel(),
            crm,
        );

        self.case_repo
            .save(&classified.to_record(sanitize_for_persistence(request.text())))
            .await?;

        info!(
            case_id = %classified.case_id,
            channel = %classified.channel,
            intent = %classified.intent,
            "Case classified"
        );

        Ok(classified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ModelCallExecutor;
    use crate::connector::adapter::{InMemoryCaseRepository, MockCrm, ScriptedCompletionClient};
    use crate::domain::{Channel, CrmStatus, Intent, PageRequest};

    const ANSWER: &str =
        r#"{"intent":"facturacion","category":"pago","tone":"neutral","confidence":0.7}"#;

    fn use_case(
        client: Arc<ScriptedCompletionClient>,
        repo: Arc<InMemoryCaseRepository>,
    ) -> ClassifyComplaintUseCase {
        let pipeline = Arc::new(ClassificationPipeline::new(ModelCallExecutor::new(client)));
        ClassifyComplaintUseCase::new(pipeline, Arc::new(MockCrm::seeded(7)), repo)
    }

    #[tokio::test]
    async fn stores_the_classified_case() {
        let client = Arc::new(ScriptedCompletionClient::new().then_ok(ANSWER));
        let repo = Arc::new(InMemoryCaseRepository::new());
        let request =
            ClassificationRequest::validate("Necesito  facturar\n nuevamente mi pedido", Some("email"))
                .unwrap();

        let case = use_case(client, repo.clone()).execute(&request).await.unwrap();

        assert_eq!(case.intent, Intent::Facturacion);
        assert_eq!(case.channel, Channel::Email);
        assert!(case.case_id.starts_with("AND-"));
        assert!(case.raw_model_output.is_none());
        // "pedido" always marks the sender as a customer.
        assert!(case.crm.is_customer);

        let page = repo.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        let stored = &page.items[0];
        assert_eq!(stored.case_id, case.case_id);
        assert_eq!(stored.text, "Necesito facturar nuevamente mi pedido");
        assert_eq!(stored.crm_status, case.crm.status);
        assert_eq!(
            stored.crm_status == CrmStatus::DuplicateFound,
            stored.crm_existing_open_case_id.is_some()
        );
    }

    #[tokio::test]
    async fn raw_output_is_kept_when_enabled() {
        let client = Arc::new(ScriptedCompletionClient::new().then_ok(ANSWER));
        let repo = Arc::new(InMemoryCaseRepository::new());
        let request = ClassificationRequest::validate("hola", None).unwrap();

        let case = use_case(client, repo.clone())
            .with_raw_output(true)
            .execute(&request)
            .await
            .unwrap();

        assert_eq!(case.channel, Channel::Web);
        assert_eq!(case.raw_model_output.as_ref().unwrap()["intent"], "facturacion");
        let page = repo.list(PageRequest::default()).await.unwrap();
        assert!(page.items[0].raw_model_output.is_some());
    }

    #[tokio::test]
    async fn failed_classification_stores_nothing() {
        let client = Arc::new(
            ScriptedCompletionClient::new()
                .then_ok("garbage")
                .then_ok("more garbage"),
        );
        let repo = Arc::new(InMemoryCaseRepository::new());
        let request = ClassificationRequest::validate("hola", None).unwrap();

        let err = use_case(client, repo.clone()).execute(&request).await.unwrap_err();

        assert!(err.is_parse());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
