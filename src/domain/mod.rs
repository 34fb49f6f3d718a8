//! # Domain Layer
//!
//! Complaint taxonomy, classification models, and the pure pieces of the
//! classification pipeline (sanitizing, prompting, response normalization).
//! This layer is independent of HTTP clients, servers and storage.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
