//! Request handlers for `/api/v1`.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    CaseRecord, ClassificationRequest, ClassifiedCase, DomainError, Page, PageRequest,
    ValidationIssue,
};

use super::problem::ApiError;
use super::server::AppState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the server started.
    pub uptime: f64,
    pub version: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /classify
///
/// Body `{ "text": string, "channel"?: "web" | "whatsapp" | "email" }`.
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClassifiedCase>, ApiError> {
    let Json(body) = payload.map_err(ApiError::from_json_rejection)?;
    let request = read_classify_body(&body)?;

    let use_case = state.container.classify_use_case();
    let case = use_case.execute(&request).await?;
    Ok(Json(case))
}

/// GET /cases?page&pageSize
pub async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<CaseRecord>>, ApiError> {
    let request = PageRequest::from_query(
        params.get("page").map(String::as_str),
        params.get("pageSize").map(String::as_str),
    );

    let use_case = state.container.list_cases_use_case();
    let page = use_case.execute(request).await?;
    Ok(Json(page))
}

#[derive(Debug, Serialize)]
struct NotFound {
    status: u16,
    message: &'static str,
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFound {
            status: 404,
            message: "Not Found",
        }),
    )
        .into_response()
}

fn read_classify_body(body: &Value) -> Result<ClassificationRequest, DomainError> {
    let text = match body.get("text") {
        Some(Value::String(text)) => text.as_str(),
        None | Some(Value::Null) => "",
        Some(_) => {
            return Err(DomainError::Validation(vec![ValidationIssue::new(
                "text",
                "text debe ser texto",
                "invalid_type",
            )]))
        }
    };

    let channel = match body.get("channel") {
        None | Some(Value::Null) => None,
        Some(Value::String(tag)) => Some(tag.as_str()),
        Some(_) => {
            return Err(DomainError::Validation(vec![ValidationIssue::new(
                "channel",
                "canal inválido",
                "invalid_enum_value",
            )]))
        }
    };

    ClassificationRequest::validate(text, channel)
}
