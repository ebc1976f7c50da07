use crate::error::AppError;
use crate::model::{
    self, DocumentCategory, Money, PaymentMethod, Project, ProjectDocument, ProjectStatus, Task,
    TaskDuration, TaskStatus, Transaction, TransactionStatus,
};
use crate::reconcile::{self, PaymentSummary, Reconciliation};
use crate::reference;
use crate::storage::{JsonStore, LedgerStore, ProgressUpdate};
use time::{OffsetDateTime, UtcOffset};

const DEFAULT_CATEGORY: &str = "Payment";

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub client: String,
    pub budget: Money,
    pub deadline: String,
    pub status: ProjectStatus,
    pub team: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub project_id: String,
    /// Falls back to "<category> Work" when blank.
    pub name: Option<String>,
    pub category: Option<String>,
    pub contractor_name: Option<String>,
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub start_date: Option<String>,
    pub duration: Option<TaskDuration>,
    pub contract_value: Money,
    pub estimated_cost: Option<Money>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub project_id: String,
    pub linked_task_id: Option<String>,
    /// Already signed; see [`model::Direction::apply`].
    pub amount: Money,
    /// Defaults to today in local time.
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    /// Generated when absent.
    pub reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub project_id: String,
    pub name: String,
    pub main_category: DocumentCategory,
    pub sub_category: String,
    pub description: Option<String>,
    pub size_bytes: u64,
    pub uploaded_by: String,
}

/// How recording a payment moved its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTransition {
    pub task: Task,
    pub previous: Reconciliation,
    pub current: Reconciliation,
}

impl TaskTransition {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    pub transaction: Transaction,
    pub task_transition: Option<TaskTransition>,
}

#[derive(Debug, Clone)]
pub struct TaskPayments {
    pub task: Task,
    pub transactions: Vec<Transaction>,
    pub summary: PaymentSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: Project,
    pub task_count: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
    pub total_contract_value: Money,
    /// Sum of money paid out (negative amounts), as a positive figure.
    pub total_spent: Money,
    pub total_received: Money,
    pub budget_remaining: Money,
    pub transaction_count: usize,
    pub document_count: usize,
}

pub fn create_project(input: NewProject) -> Result<Project, AppError> {
    let mut store = JsonStore::open_default()?;
    create_project_with_store(&mut store, input)
}

pub fn list_projects() -> Result<Vec<Project>, AppError> {
    JsonStore::open_default()?.projects()
}

pub fn get_project(id: &str) -> Result<Project, AppError> {
    get_project_with_store(&JsonStore::open_default()?, id)
}

pub fn add_task(input: NewTask) -> Result<Task, AppError> {
    let mut store = JsonStore::open_default()?;
    add_task_with_store(&mut store, input)
}

pub fn list_tasks(project_id: &str) -> Result<Vec<Task>, AppError> {
    list_tasks_with_store(&JsonStore::open_default()?, project_id)
}

pub fn task_payments(task_id: &str) -> Result<TaskPayments, AppError> {
    task_payments_with_store(&JsonStore::open_default()?, task_id)
}

pub fn record_transaction(input: NewTransaction) -> Result<RecordedTransaction, AppError> {
    let mut store = JsonStore::open_default()?;
    record_transaction_with_store(&mut store, input)
}

pub fn preview_payment(
    project_id: &str,
    task_id: &str,
    amount: Money,
) -> Result<TaskTransition, AppError> {
    preview_payment_with_store(&JsonStore::open_default()?, project_id, task_id, amount)
}

pub fn list_transactions(project_id: &str) -> Result<Vec<Transaction>, AppError> {
    list_transactions_with_store(&JsonStore::open_default()?, project_id)
}

pub fn add_document(input: NewDocument) -> Result<ProjectDocument, AppError> {
    let mut store = JsonStore::open_default()?;
    add_document_with_store(&mut store, input)
}

pub fn list_documents(project_id: &str) -> Result<Vec<ProjectDocument>, AppError> {
    list_documents_with_store(&JsonStore::open_default()?, project_id)
}

pub fn project_summary(project_id: &str) -> Result<ProjectSummary, AppError> {
    project_summary_with_store(&JsonStore::open_default()?, project_id)
}

pub fn create_project_with_store<S: LedgerStore>(
    store: &mut S,
    input: NewProject,
) -> Result<Project, AppError> {
    let name = required(&input.name, "project name")?;
    let client = required(&input.client, "client")?;
    if input.budget.is_negative() {
        return Err(AppError::invalid_input("budget cannot be negative"));
    }
    let deadline = model::format_date(model::parse_date(&input.deadline)?)?;

    let now = OffsetDateTime::now_utc();
    let created_at = model::timestamp(now)?;
    let project = Project {
        id: reference::record_id("project", now),
        name,
        client,
        budget: input.budget,
        deadline,
        status: input.status,
        team: input.team,
        created_at: created_at.clone(),
        updated_at: created_at,
    };

    store.insert_project(project.clone())?;
    tracing::info!(project_id = %project.id, name = %project.name, "created project");
    Ok(project)
}

pub fn get_project_with_store<S: LedgerStore>(store: &S, id: &str) -> Result<Project, AppError> {
    let id = required(id, "project id")?;
    store
        .project(&id)?
        .ok_or_else(|| AppError::not_found("project", id))
}

/// Creates a pending task with no progress. A contract value of zero or
/// less is rejected here so reconciliation never has to guard against it.
pub fn add_task_with_store<S: LedgerStore>(
    store: &mut S,
    input: NewTask,
) -> Result<Task, AppError> {
    let project = get_project_with_store(store, &input.project_id)?;
    let category = optional(input.category);
    let name = match (optional(input.name), category.as_deref()) {
        (Some(name), _) => name,
        (None, Some(category)) => format!("{category} Work"),
        (None, None) => return Err(AppError::invalid_input("task name or category is required")),
    };
    if !input.contract_value.is_positive() {
        return Err(AppError::invalid_input(
            "contract value must be greater than zero",
        ));
    }
    if input.estimated_cost.is_some_and(Money::is_negative) {
        return Err(AppError::invalid_input("estimated cost cannot be negative"));
    }
    let start_date = optional(input.start_date)
        .map(|raw| model::parse_date(&raw).and_then(model::format_date))
        .transpose()?;
    if input.duration.is_some_and(|duration| duration.amount == 0) {
        return Err(AppError::invalid_input("duration must be at least 1"));
    }

    let now = OffsetDateTime::now_utc();
    let task = Task {
        id: reference::record_id("task", now),
        project_id: project.id,
        name,
        category,
        contractor_name: optional(input.contractor_name),
        company_name: optional(input.company_name),
        contact_email: optional(input.contact_email),
        contact_phone: optional(input.contact_phone),
        start_date,
        duration: input.duration,
        contract_value: input.contract_value,
        estimated_cost: input.estimated_cost,
        status: TaskStatus::Pending,
        progress: 0,
        created_at: model::timestamp(now)?,
    };

    store.insert_task(task.clone())?;
    tracing::info!(
        task_id = %task.id,
        project_id = %task.project_id,
        contract_value = task.contract_value.minor(),
        "added task"
    );
    Ok(task)
}

pub fn list_tasks_with_store<S: LedgerStore>(
    store: &S,
    project_id: &str,
) -> Result<Vec<Task>, AppError> {
    let project = get_project_with_store(store, project_id)?;
    store.tasks_for_project(&project.id)
}

pub fn get_task_with_store<S: LedgerStore>(store: &S, id: &str) -> Result<Task, AppError> {
    let id = required(id, "task id")?;
    store.task(&id)?.ok_or_else(|| AppError::not_found("task", id))
}

pub fn task_payments_with_store<S: LedgerStore>(
    store: &S,
    task_id: &str,
) -> Result<TaskPayments, AppError> {
    let task = get_task_with_store(store, task_id)?;
    let transactions = store.transactions_for_task(&task.id)?;
    let summary = reconcile::payment_summary(&task, &transactions);
    Ok(TaskPayments {
        task,
        transactions,
        summary,
    })
}

/// Appends a transaction and, when it is linked to a task, reconciles that
/// task against all of its payments. The transaction and the new
/// status/progress are written together.
pub fn record_transaction_with_store<S: LedgerStore>(
    store: &mut S,
    input: NewTransaction,
) -> Result<RecordedTransaction, AppError> {
    let (project, linked_task) =
        payment_target(store, &input.project_id, input.linked_task_id, input.amount)?;

    let now = OffsetDateTime::now_utc();
    let date = match optional(input.date) {
        Some(raw) => model::format_date(model::parse_date(&raw)?)?,
        None => today(now)?,
    };
    let description = optional(input.description)
        .or_else(|| {
            linked_task
                .as_ref()
                .map(|task| format!("Payment for {}", task.name))
        })
        .unwrap_or_default();
    let transaction = Transaction {
        id: reference::transaction_id(now),
        project_id: project.id,
        linked_task_id: linked_task.as_ref().map(|task| task.id.clone()),
        date,
        description,
        category: optional(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        amount: input.amount,
        payment_method: input.payment_method,
        status: input.status,
        reference: optional(input.reference)
            .unwrap_or_else(|| reference::transaction_reference(now)),
        created_at: model::timestamp(now)?,
    };

    let mut task_transition = match linked_task {
        Some(task) => Some(reconcile_with_payment(store, task, &transaction)?),
        None => None,
    };
    let progress = task_transition
        .as_ref()
        .filter(|transition| transition.changed())
        .map(|transition| ProgressUpdate {
            task_id: &transition.task.id,
            status: transition.current.status,
            progress: transition.current.progress,
        });

    let updated = store.append_transaction(transaction.clone(), progress)?;
    tracing::info!(
        transaction_id = %transaction.id,
        project_id = %transaction.project_id,
        task_id = transaction.linked_task_id.as_deref().unwrap_or("-"),
        amount = transaction.amount.minor(),
        "recorded transaction"
    );
    if let (Some(updated), Some(transition)) = (updated, task_transition.as_mut()) {
        tracing::info!(
            task_id = %updated.id,
            from = %transition.previous.status,
            to = %transition.current.status,
            progress = transition.current.progress,
            "task status reconciled"
        );
        transition.task = updated;
    }

    Ok(RecordedTransaction {
        transaction,
        task_transition,
    })
}

/// Reconciles a task as if a payment of `amount` against `project_id` had
/// been recorded, without writing anything. Fails exactly where recording
/// the same payment would.
pub fn preview_payment_with_store<S: LedgerStore>(
    store: &S,
    project_id: &str,
    task_id: &str,
    amount: Money,
) -> Result<TaskTransition, AppError> {
    let (project, task) = payment_target(store, project_id, Some(task_id.to_string()), amount)?;
    let task = task.ok_or_else(|| AppError::invalid_input("task id is required"))?;

    let now = OffsetDateTime::now_utc();
    let transaction = Transaction {
        id: reference::transaction_id(now),
        project_id: project.id,
        linked_task_id: Some(task.id.clone()),
        date: today(now)?,
        description: format!("Payment for {}", task.name),
        category: DEFAULT_CATEGORY.to_string(),
        amount,
        payment_method: PaymentMethod::Bank,
        status: TransactionStatus::Pending,
        reference: reference::transaction_reference(now),
        created_at: model::timestamp(now)?,
    };
    reconcile_with_payment(store, task, &transaction)
}

/// Looks up the project and optional task a payment goes to and checks the
/// amount. Shared by recording and previewing.
fn payment_target<S: LedgerStore>(
    store: &S,
    project_id: &str,
    task_id: Option<String>,
    amount: Money,
) -> Result<(Project, Option<Task>), AppError> {
    let project = get_project_with_store(store, project_id)?;
    if amount.is_zero() {
        return Err(AppError::invalid_input("amount cannot be zero"));
    }

    let task = match optional(task_id) {
        Some(task_id) => {
            let task = get_task_with_store(store, &task_id)?;
            if task.project_id != project.id {
                return Err(AppError::invalid_input(format!(
                    "task {} belongs to project {}, not {}",
                    task.id, task.project_id, project.id
                )));
            }
            Some(task)
        }
        None => None,
    };
    Ok((project, task))
}

/// Reconciles `task` against its stored payments plus `transaction`. The
/// returned task carries the resulting status/progress.
fn reconcile_with_payment<S: LedgerStore>(
    store: &S,
    task: Task,
    transaction: &Transaction,
) -> Result<TaskTransition, AppError> {
    let mut payments = store.transactions_for_task(&task.id)?;
    payments.push(transaction.clone());

    let previous = Reconciliation::current(&task);
    let current = reconcile::reconcile(&task, &payments);
    let mut task = task;
    task.status = current.status;
    task.progress = current.progress;
    Ok(TaskTransition {
        task,
        previous,
        current,
    })
}

pub fn list_transactions_with_store<S: LedgerStore>(
    store: &S,
    project_id: &str,
) -> Result<Vec<Transaction>, AppError> {
    let project = get_project_with_store(store, project_id)?;
    store.transactions_for_project(&project.id)
}

pub fn add_document_with_store<S: LedgerStore>(
    store: &mut S,
    input: NewDocument,
) -> Result<ProjectDocument, AppError> {
    let project = get_project_with_store(store, &input.project_id)?;
    let name = required(&input.name, "document name")?;
    let sub_category = required(&input.sub_category, "sub-category")?;
    let uploaded_by = required(&input.uploaded_by, "uploader")?;

    let now = OffsetDateTime::now_utc();
    let document = ProjectDocument {
        id: reference::record_id("doc", now),
        project_id: project.id,
        name,
        main_category: input.main_category,
        sub_category,
        description: optional(input.description),
        size_bytes: input.size_bytes,
        uploaded_by,
        uploaded_at: model::timestamp(now)?,
    };

    store.insert_document(document.clone())?;
    tracing::info!(document_id = %document.id, project_id = %document.project_id, "added document");
    Ok(document)
}

pub fn list_documents_with_store<S: LedgerStore>(
    store: &S,
    project_id: &str,
) -> Result<Vec<ProjectDocument>, AppError> {
    let project = get_project_with_store(store, project_id)?;
    store.documents_for_project(&project.id)
}

pub fn project_summary_with_store<S: LedgerStore>(
    store: &S,
    project_id: &str,
) -> Result<ProjectSummary, AppError> {
    let project = get_project_with_store(store, project_id)?;
    let tasks = store.tasks_for_project(&project.id)?;
    let transactions = store.transactions_for_project(&project.id)?;
    let documents = store.documents_for_project(&project.id)?;

    let count_status = |status: TaskStatus| tasks.iter().filter(|task| task.status == status).count();
    let total_spent: Money = transactions
        .iter()
        .filter(|transaction| transaction.amount.is_negative())
        .map(|transaction| transaction.amount.abs())
        .sum();
    let total_received: Money = transactions
        .iter()
        .filter(|transaction| transaction.amount.is_positive())
        .map(|transaction| transaction.amount)
        .sum();

    Ok(ProjectSummary {
        task_count: tasks.len(),
        pending_tasks: count_status(TaskStatus::Pending),
        in_progress_tasks: count_status(TaskStatus::InProgress),
        completed_tasks: count_status(TaskStatus::Completed),
        total_contract_value: tasks.iter().map(|task| task.contract_value).sum(),
        total_spent,
        total_received,
        budget_remaining: project.budget - total_spent,
        transaction_count: transactions.len(),
        document_count: documents.len(),
        project,
    })
}

fn today(now: OffsetDateTime) -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    model::format_date(now.to_offset(offset).date())
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
