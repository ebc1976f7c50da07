use super::{LedgerState, LedgerStore, ProgressUpdate};
use crate::error::AppError;
use crate::model::{Project, ProjectDocument, Task, Transaction};

/// Keeps the whole ledger in memory. Used by tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: LedgerState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: LedgerState) -> Result<Self, AppError> {
        state.validate()?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }
}

impl LedgerStore for MemoryStore {
    fn insert_project(&mut self, project: Project) -> Result<(), AppError> {
        self.state.insert_project(project)
    }

    fn project(&self, id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.state.project(id))
    }

    fn projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.state.projects.clone())
    }

    fn insert_task(&mut self, task: Task) -> Result<(), AppError> {
        self.state.insert_task(task)
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
        self.state.append_transaction(transaction, progress)
    }

    fn transactions_for_project(&self, project_id: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self.state.transactions_for_project(project_id))
    }

    fn transactions_for_task(&self, task_id: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self.state.transactions_for_task(task_id))
    }

    fn insert_document(&mut self, document: ProjectDocument) -> Result<(), AppError> {
        self.state.insert_document(document)
    }

    fn documents_for_project(&self, project_id: &str) -> Result<Vec<ProjectDocument>, AppError> {
        Ok(self.state.documents_for_project(project_id))
    }
}
