//! HTTP API served under `/api/v1`.

mod handlers;
mod problem;
mod server;

pub use handlers::HealthResponse;
pub use problem::{ApiError, ProblemDetails, INTERNAL_ERROR_TYPE, VALIDATION_ERROR_TYPE};
pub use server::{build_router, serve, AppState, ServerConfig, MAX_BODY_BYTES};
