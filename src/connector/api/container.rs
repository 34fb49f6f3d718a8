use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    CaseRepository, ClassificationPipeline, ClassifyComplaintUseCase, CompletionClient,
    CrmService, ListCasesUseCase, ModelCallExecutor,
};
use crate::connector::adapter::{
    InMemoryCaseRepository, MockCompletionClient, MockCrm, OpenAiClient, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_CASE_LOG_DIR: &str = "storage";

/// Deployment environment. Raw model output is only exposed outside
/// production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!(
                "unknown environment '{other}' (expected development, test or production)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub environment: Environment,
    pub log_level: String,
    /// Directory for `cases.log`; `None` keeps cases in memory only.
    pub case_log_dir: Option<String>,
    /// Answer with the offline keyword classifier instead of calling a model.
    pub mock_model: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            environment: Environment::default(),
            log_level: "info".to_string(),
            case_log_dir: Some(DEFAULT_CASE_LOG_DIR.to_string()),
            mock_model: false,
        }
    }
}

impl ContainerConfig {
    /// Read configuration from the process environment:
    ///
    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `PORT`            | `4000`                   |
    /// | `OPENAI_API_KEY`  | `""`                     |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`            |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    /// | `APP_ENV`         | `NODE_ENV`, then `development` |
    /// | `LOG_LEVEL`       | `info`                   |
    /// | `CASES_LOG_DIR`   | `storage` (empty disables the log) |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ContainerConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .and_then(|e| e.parse::<Environment>().ok())
            .unwrap_or_default();
        let case_log_dir = match lookup("CASES_LOG_DIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(dir),
            None => defaults.case_log_dir,
        };

        Self {
            port,
            api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            model: lookup("OPENAI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            base_url: lookup("OPENAI_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.base_url),
            environment,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            case_log_dir,
            mock_model: false,
        }
    }
}

pub struct Container {
    pipeline: Arc<ClassificationPipeline>,
    crm: Arc<dyn CrmService>,
    case_repo: Arc<dyn CaseRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let client: Arc<dyn CompletionClient> = if config.mock_model {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::new())
        } else {
            debug!("Using OpenAI client (model {}, {})", config.model, config.base_url);
            Arc::new(OpenAiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
            ))
        };

        let case_repo: Arc<dyn CaseRepository> = match config.case_log_dir.as_deref() {
            Some(dir) => {
                debug!("Appending cases to {}/cases.log", dir);
                Arc::new(InMemoryCaseRepository::with_log_dir(dir)?)
            }
            None => Arc::new(InMemoryCaseRepository::new()),
        };

        Ok(Self::with_components(
            config,
            client,
            Arc::new(MockCrm::new()),
            case_repo,
        ))
    }

    /// Assemble a container from explicit collaborators.
    pub fn with_components(
        config: ContainerConfig,
        client: Arc<dyn CompletionClient>,
        crm: Arc<dyn CrmService>,
        case_repo: Arc<dyn CaseRepository>,
    ) -> Self {
        let pipeline = Arc::new(ClassificationPipeline::new(ModelCallExecutor::new(client)));
        Self {
            pipeline,
            crm,
            case_repo,
            config,
        }
    }

    pub fn classify_use_case(&self) -> ClassifyComplaintUseCase {
        ClassifyComplaintUseCase::new(
            self.pipeline.clone(),
            self.crm.clone(),
            self.case_repo.clone(),
        )
        .with_raw_output(self.expose_raw_output())
    }

    pub fn list_cases_use_case(&self) -> ListCasesUseCase {
        ListCasesUseCase::new(self.case_repo.clone())
    }

    pub fn expose_raw_output(&self) -> bool {
        !self.config.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = ContainerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 4000);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.case_log_dir.as_deref(), Some("storage"));
    }

    #[test]
    fn reads_overrides() {
        let config = ContainerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("NODE_ENV", "production"),
            ("CASES_LOG_DIR", ""),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4.1-mini");
        assert!(config.environment.is_production());
        assert!(config.case_log_dir.is_none());
    }

    #[test]
    fn app_env_wins_over_node_env_and_bad_port_falls_back() {
        let config = ContainerConfig::from_lookup(lookup(&[
            ("APP_ENV", "test"),
            ("NODE_ENV", "production"),
            ("PORT", "not-a-port"),
        ]));
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn environment_parses_through_from_str() {
        assert_eq!("PRODUCTION".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(" test ".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());

        let config = ContainerConfig::from_lookup(lookup(&[("APP_ENV", "staging")]));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn raw_output_is_hidden_in_production() {
        let mut config = ContainerConfig {
            case_log_dir: None,
            mock_model: true,
            ..ContainerConfig::default()
        };
        let container = Container::new(config.clone()).unwrap();
        assert!(container.expose_raw_output());

        config.environment = Environment::Production;
        let container = Container::new(config).unwrap();
        assert!(!container.expose_raw_output());
    }
}
