//! Persistence seam for the ledger.
//!
//! Ledger operations only talk to [`LedgerStore`], which exposes inserts,
//! append-only transaction writes and per-project / per-task queries. The
//! in-memory and JSON file stores both keep their data in a [`LedgerState`].

use crate::error::AppError;
use crate::model::{Project, ProjectDocument, Task, TaskStatus, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod json_store;
pub mod memory;

pub use json_store::JsonStore;
pub use memory::MemoryStore;

pub trait LedgerStore {
    fn insert_project(&mut self, project: Project) -> Result<(), AppError>;
    fn project(&self, id: &str) -> Result<Option<Project>, AppError>;
    fn projects(&self) -> Result<Vec<Project>, AppError>;

    fn insert_task(&mut self, task: Task) -> Result<(), AppError>;
    fn task(&self, id: &str) -> Result<Option<Task>, AppError>;
    fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>, AppError>;

    /// Appends a transaction and applies the reconciled task progress in one
    /// write. Either both land or neither does. Returns the updated task.
    fn append_transaction(
        &mut self,
        transaction: Transaction,
        progress: Option<ProgressUpdate<'_>>,
    ) -> Result<Option<Task>, AppError>;
    /// Transactions of a project in append order.
    fn transactions_for_project(&self, project_id: &str) -> Result<Vec<Transaction>, AppError>;
    /// Transactions linked to a task in append order.
    fn transactions_for_task(&self, task_id: &str) -> Result<Vec<Transaction>, AppError>;

    fn insert_document(&mut self, document: ProjectDocument) -> Result<(), AppError>;
    fn documents_for_project(&self, project_id: &str) -> Result<Vec<ProjectDocument>, AppError>;
}

/// The reconciliation-owned fields of a task, written with a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate<'a> {
    pub task_id: &'a str,
    pub status: TaskStatus,
    pub progress: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub documents: Vec<ProjectDocument>,
}

impl LedgerState {
    /// Checks id uniqueness and that every record points at records that exist.
    pub fn validate(&self) -> Result<(), AppError> {
        let project_ids = unique_ids("project", self.projects.iter().map(|p| p.id.as_str()))?;
        let task_ids = unique_ids("task", self.tasks.iter().map(|t| t.id.as_str()))?;
        unique_ids(
            "transaction",
            self.transactions.iter().map(|t| t.id.as_str()),
        )?;
        unique_ids("document", self.documents.iter().map(|d| d.id.as_str()))?;

        for task in &self.tasks {
            if !project_ids.contains(task.project_id.as_str()) {
                return Err(AppError::invalid_data(format!(
                    "task {} references unknown project {}",
                    task.id, task.project_id
                )));
            }
            if !task.contract_value.is_positive() {
                return Err(AppError::invalid_data(format!(
                    "task {} has a non-positive contract value",
                    task.id
                )));
            }
            if task.progress > 100 {
                return Err(AppError::invalid_data(format!(
                    "task {} has progress above 100",
                    task.id
                )));
            }
        }

        for transaction in &self.transactions {
            if !project_ids.contains(transaction.project_id.as_str()) {
                return Err(AppError::invalid_data(format!(
                    "transaction {} references unknown project {}",
                    transaction.id, transaction.project_id
                )));
            }
            if let Some(task_id) = transaction.linked_task_id.as_deref()
                && !task_ids.contains(task_id)
            {
                return Err(AppError::invalid_data(format!(
                    "transaction {} references unknown task {}",
                    transaction.id, task_id
                )));
            }
        }

        for document in &self.documents {
            if !project_ids.contains(document.project_id.as_str()) {
                return Err(AppError::invalid_data(format!(
                    "document {} references unknown project {}",
                    document.id, document.project_id
                )));
            }
        }

        Ok(())
    }

    pub(crate) fn insert_project(&mut self, project: Project) -> Result<(), AppError> {
        if self.projects.iter().any(|existing| existing.id == project.id) {
            return Err(duplicate("project", &project.id));
        }
        self.projects.push(project);
        Ok(())
    }

    pub(crate) fn project(&self, id: &str) -> Option<Project> {
        self.projects.iter().find(|project| project.id == id).cloned()
    }

    pub(crate) fn insert_task(&mut self, task: Task) -> Result<(), AppError> {
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(duplicate("task", &task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub(crate) fn task(&self, id: &str) -> Option<Task> {
        self.tasks.iter().find(|task| task.id == id).cloned()
    }

    pub(crate) fn tasks_for_project(&self, project_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect()
    }

    fn update_task_progress(
        &mut self,
        task_id: &str,
        status: TaskStatus,
        progress: u8,
    ) -> Result<Task, AppError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| AppError::not_found("task", task_id))?;
        task.status = status;
        task.progress = progress.min(100);
        Ok(task.clone())
    }

    /// Checks everything before touching the state, so a failed call leaves
    /// it unchanged.
    pub(crate) fn append_transaction(
        &mut self,
        transaction: Transaction,
        progress: Option<ProgressUpdate<'_>>,
    ) -> Result<Option<Task>, AppError> {
        if self
            .transactions
            .iter()
            .any(|existing| existing.id == transaction.id)
        {
            return Err(duplicate("transaction", &transaction.id));
        }
        if let Some(update) = progress
            && !self.tasks.iter().any(|task| task.id == update.task_id)
        {
            return Err(AppError::not_found("task", update.task_id));
        }

        self.transactions.push(transaction);
        progress
            .map(|update| {
                self.update_task_progress(update.task_id, update.status, update.progress)
            })
            .transpose()
    }

    pub(crate) fn transactions_for_project(&self, project_id: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| transaction.project_id == project_id)
            .cloned()
            .collect()
    }

    pub(crate) fn transactions_for_task(&self, task_id: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| transaction.is_linked_to(task_id))
            .cloned()
            .collect()
    }

    pub(crate) fn insert_document(&mut self, document: ProjectDocument) -> Result<(), AppError> {
        if self.documents.iter().any(|existing| existing.id == document.id) {
            return Err(duplicate("document", &document.id));
        }
        self.documents.push(document);
        Ok(())
    }

    pub(crate) fn documents_for_project(&self, project_id: &str) -> Vec<ProjectDocument> {
        self.documents
            .iter()
            .filter(|document| document.project_id == project_id)
            .cloned()
            .collect()
    }
}

fn duplicate(kind: &str, id: &str) -> AppError {
    AppError::invalid_input(format!("{kind} id {id} already exists"))
}

fn unique_ids<'a, I>(kind: &str, ids: I) -> Result<HashSet<&'a str>, AppError>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AppError::invalid_data(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(seen)
}
