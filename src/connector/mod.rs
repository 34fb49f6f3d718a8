//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Language model access (OpenAI-compatible HTTP, offline keyword mock)
//! - CRM registration (mock)
//! - Case storage (in memory, with an append-only JSON-lines log)
//! - Entry points: CLI controllers and the HTTP API

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
