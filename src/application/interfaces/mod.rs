mod case_repository;
mod completion_client;
mod crm_service;

pub use case_repository::*;
pub use completion_client::*;
pub use crm_service::*;
