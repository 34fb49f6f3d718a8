use anyhow::{anyhow, Result};

use crate::cli::OutputFormat;
use crate::domain::{ClassificationRequest, ClassifiedCase, DomainError, ValidationIssue};

use super::super::Container;

pub struct ClassifyController<'a> {
    container: &'a Container,
}

impl<'a> ClassifyController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn classify(
        &self,
        text: String,
        channel: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let request = ClassificationRequest::validate(&text, channel.as_deref())
            .map_err(describe_error)?;

        let use_case = self.container.classify_use_case();
        let case = use_case.execute(&request).await.map_err(describe_error)?;

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&case)?),
            OutputFormat::Text => Ok(self.format_case(&case)),
        }
    }

    fn format_case(&self, case: &ClassifiedCase) -> String {
        let mut output = format!(
            "Case {} ({})\n  Intent:     {}\n  Category:   {}\n  Tone:       {}\n  Confidence: {:.2}\n  CRM:        {} (customer: {})",
            case.case_id,
            case.channel,
            case.intent,
            case.category,
            case.tone,
            case.confidence,
            case.crm.status,
            if case.crm.is_customer { "yes" } else { "no" },
        );

        if let Some(open_case) = &case.crm.existing_open_case_id {
            output.push_str(&format!("\n  Open case:  {}", open_case));
        }

        output
    }
}

fn describe_error(error: DomainError) -> anyhow::Error {
    match error {
        DomainError::Validation(issues) => anyhow!("Invalid request: {}", format_issues(&issues)),
        other => other.into(),
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {} ({})", i.path, i.message, i.code))
        .collect::<Vec<_>>()
        .join("; ")
}
