pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, OutputFormat};

pub use application::{
    CaseRepository, ClassificationPipeline, ClassifyComplaintUseCase, CompletionClient,
    CrmService, ListCasesUseCase, ModelCallExecutor,
};

pub use connector::{
    build_router, serve, AppState, Container, ContainerConfig, Environment,
    InMemoryCaseRepository, MockCompletionClient, MockCrm, OpenAiClient, Router,
    ScriptedCompletionClient, ServerConfig,
};

pub use domain::{
    CaseRecord, Category, Channel, ClassificationRequest, ClassificationResult, ClassifiedCase,
    CrmOutcome, CrmStatus, DomainError, Intent, Page, PageRequest, Tone, ValidationIssue,
};
