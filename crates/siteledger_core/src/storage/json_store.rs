use super::{LedgerState, LedgerStore, ProgressUpdate};
use crate::config::app_dir;
use crate::error::AppError;
use crate::model::{Project, ProjectDocument, Task, Transaction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "ledger.json";
const STORE_ENV_VAR: &str = "SITELEDGER_STORE_PATH";

#[derive(Debug, Deserialize)]
struct StoredLedger {
    schema_version: u32,
    #[serde(flatten)]
    state: LedgerState,
}

#[derive(Debug, Serialize)]
struct StoredLedgerRef<'a> {
    schema_version: u32,
    #[serde(flatten)]
    state: &'a LedgerState,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(STORE_FILE_NAME))
}

pub fn load_state(path: &Path) -> Result<LedgerState, AppError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "ledger file missing, starting empty");
        return Ok(LedgerState::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredLedger =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }
    stored.state.validate()?;

    tracing::debug!(
        path = %path.display(),
        projects = stored.state.projects.len(),
        tasks = stored.state.tasks.len(),
        transactions = stored.state.transactions.len(),
        "loaded ledger"
    );
    Ok(stored.state)
}

pub fn save_state(path: &Path, state: &LedgerState) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredLedgerRef {
        schema_version: SCHEMA_VERSION,
        state,
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    tracing::debug!(path = %path.display(), "saved ledger");
    Ok(())
}

/// A ledger backed by one JSON file. Every mutation rewrites the file; the
/// in-memory copy only changes once the write succeeded.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: LedgerState,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let state = load_state(&path)?;
        Ok(Self { path, state })
    }

    pub fn open_default() -> Result<Self, AppError> {
        Self::open(store_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut LedgerState) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut next = self.state.clone();
        let outcome = change(&mut next)?;
        save_state(&self.path, &next)?;
        self.state = next;
        Ok(outcome)
    }
}

impl LedgerStore for JsonStore {
    fn insert_project(&mut self, project: Project) -> Result<(), AppError> {
        self.mutate(|state| state.insert_project(project))
    }

    fn project(&self, id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.state.project(id))
    }

    fn projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.state.projects.clone())
    }

    fn insert_task(&mut self, task: Task) -> Result<(), AppError> {
        self.mutate(|state| state.insert_task(task))
    }

    fn task(&self, id: &str) -> Result<Option<Task>, AppError> {
        Ok(self.state.task(id))
    }

    fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>, AppError> {
        Ok(self.state.tasks_for_project(project_id))
    }

    fn append_transaction(
        &mut self,
        transaction: Transaction,
        progress: Option<ProgressUpdate<'_>>,
    ) -> Result<Option<Task>, AppError> {
        self.mutate(|state| state.append_transaction(transaction, progress))
    }

    fn transactions_for_project(&self, project_id: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self.state.transactions_for_project(project_id))
    }

    fn transactions_for_task(&self, task_id: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self.state.transactions_for_task(task_id))
    }

    fn insert_document(&mut self, document: ProjectDocument) -> Result<(), AppError> {
        self.mutate(|state| state.insert_document(document))
    }

    fn documents_for_project(&self, project_id: &str) -> Result<Vec<ProjectDocument>, AppError> {
        Ok(self.state.documents_for_project(project_id))
    }
}
