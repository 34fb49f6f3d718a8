use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::{generate_trace_id, DomainError, ValidationIssue};

pub const VALIDATION_ERROR_TYPE: &str = "https://andino-postventa/errors/validation-error";
pub const INTERNAL_ERROR_TYPE: &str = "https://andino-postventa/errors/internal-error";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 7807 style error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationIssue>>,
}

/// A failed request, rendered as `application/problem+json`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: DomainError,
}

impl ApiError {
    pub fn with_status(status: StatusCode, error: DomainError) -> Self {
        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Unreadable bodies count as validation failures, except oversized ones.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::with_status(
                StatusCode::PAYLOAD_TOO_LARGE,
                DomainError::internal(rejection.body_text()),
            );
        }
        DomainError::Validation(vec![ValidationIssue::new(
            "body",
            rejection.body_text(),
            "invalid_json",
        )])
        .into()
    }

    fn into_problem(self, trace_id: String) -> ProblemDetails {
        match self.error {
            DomainError::Validation(issues) => {
                warn!(trace_id = %trace_id, issues = issues.len(), "Validation error");
                ProblemDetails {
                    kind: VALIDATION_ERROR_TYPE,
                    title: "Invalid request payload",
                    status: self.status.as_u16(),
                    detail: "One or more fields failed validation".to_string(),
                    trace_id,
                    errors: Some(issues),
                }
            }
            other => {
                let detail = other.to_string();
                error!(trace_id = %trace_id, status = self.status.as_u16(), "Unhandled error: {}", detail);
                ProblemDetails {
                    kind: INTERNAL_ERROR_TYPE,
                    title: "Internal Server Error",
                    status: self.status.as_u16(),
                    detail,
                    trace_id,
                    errors: None,
                }
            }
        }
    }
}

fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Transport {
            status: Some(_), ..
        } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self {
            status: status_for(&error),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let problem = self.into_problem(generate_trace_id());

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (DomainError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (
                DomainError::transport(Some(503), "down"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DomainError::transport(Some(401), "unauthorized"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DomainError::transport(None, "timeout"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::configuration("no key"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::parse("bad", "garbage"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[test]
    fn validation_problem_lists_issues() {
        let error = ApiError::from(DomainError::Validation(vec![ValidationIssue::new(
            "text",
            "text requerido",
            "too_small",
        )]));
        let problem = serde_json::to_value(error.into_problem("trace-1".to_string())).unwrap();

        assert_eq!(problem["type"], VALIDATION_ERROR_TYPE);
        assert_eq!(problem["status"], 400);
        assert_eq!(problem["traceId"], "trace-1");
        assert_eq!(problem["errors"][0]["path"], "text");
        assert_eq!(problem["errors"][0]["code"], "too_small");
    }

    #[test]
    fn internal_problem_has_no_issue_list() {
        let error = ApiError::from(DomainError::configuration("OpenAI API key is not configured"));
        let problem = serde_json::to_value(error.into_problem("t".to_string())).unwrap();

        assert_eq!(problem["type"], INTERNAL_ERROR_TYPE);
        assert_eq!(problem["title"], "Internal Server Error");
        assert_eq!(problem["status"], 500);
        assert!(problem["detail"]
            .as_str()
            .unwrap()
            .contains("OpenAI API key is not configured"));
        assert!(problem.get("errors").is_none());
    }
}
