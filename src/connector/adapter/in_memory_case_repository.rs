use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CaseRepository;
use crate::domain::{CaseRecord, DomainError, Page, PageRequest};

pub const CASE_LOG_FILE: &str = "cases.log";

/// Case store kept in memory, in arrival order.
///
/// Optionally mirrors every saved case as one JSON line in `cases.log`
/// (without the raw model output, plus a write `timestamp`). The log is
/// append-only and never read back.
pub struct InMemoryCaseRepository {
    cases: Arc<Mutex<Vec<CaseRecord>>>,
    log_path: Option<PathBuf>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self {
            cases: Arc::new(Mutex::new(Vec::new())),
            log_path: None,
        }
    }

    /// Store cases in memory and append them to `<dir>/cases.log`, creating
    /// `dir` if needed.
    pub fn with_log_dir(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            cases: Arc::new(Mutex::new(Vec::new())),
            log_path: Some(dir.join(CASE_LOG_FILE)),
        })
    }

    async fn append_log(&self, path: &Path, record: &CaseRecord) -> Result<(), DomainError> {
        let mut entry = serde_json::to_value(record)
            .map_err(|e| DomainError::storage(format!("failed to serialize case: {e}")))?;
        if let Value::Object(map) = &mut entry {
            map.remove("rawModelOutput");
            map.insert(
                "timestamp".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }

        let mut line = entry.to_string();
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

impl Default for InMemoryCaseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn save(&self, record: &CaseRecord) -> Result<(), DomainError> {
        // Hold the lock across the log write so log order matches list order.
        let mut cases = self.cases.lock().await;
        if let Some(path) = &self.log_path {
            self.append_log(path, record).await?;
        }
        cases.push(record.clone());
        debug!("Saved case {} ({} in store)", record.case_id, cases.len());
        Ok(())
    }

    async fn list(&self, request: PageRequest) -> Result<Page<CaseRecord>, DomainError> {
        let cases = self.cases.lock().await;
        let items = cases
            .iter()
            .skip(request.offset())
            .take(request.page_size())
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: cases.len(),
            page: request.page(),
            page_size: request.page_size(),
        })
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let cases = self.cases.lock().await;
        Ok(cases.len() as u64)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut cases = self.cases.lock().await;
        cases.clear();
        Ok(())
    }
}
