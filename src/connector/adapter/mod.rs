mod in_memory_case_repository;
mod mock_completion_client;
mod mock_crm;
mod openai_client;
mod scripted_completion_client;

pub use in_memory_case_repository::*;
pub use mock_completion_client::*;
pub use mock_crm::*;
pub use openai_client::*;
pub use scripted_completion_client::*;
