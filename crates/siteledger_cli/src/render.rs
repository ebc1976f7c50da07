use siteledger_core::config::{Config, Palette};
use siteledger_core::ledger_api::{ProjectSummary, RecordedTransaction, TaskPayments, TaskTransition};
use siteledger_core::model::{Money, Project, ProjectDocument, Task, Transaction};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Turns ledger records into terminal text or JSON values.
pub struct Renderer {
    palette: Palette,
    currency_symbol: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Contractor")]
    contractor: String,
    #[tabled(rename = "Contract")]
    contract_value: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Task")]
    task: String,
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Uploaded by")]
    uploaded_by: String,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            palette: config.palette(),
            currency_symbol: config.currency_symbol().to_string(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{}", self.currency_symbol, amount)
        }
    }

    fn table<R: Tabled>(rows: Vec<R>, empty: &str) -> String {
        if rows.is_empty() {
            return empty.to_string();
        }
        Table::new(rows).with(Style::sharp()).to_string()
    }

    pub fn projects(&self, projects: &[Project]) -> String {
        let rows = projects
            .iter()
            .map(|project| ProjectRow {
                id: project.id.clone(),
                name: project.name.clone(),
                client: project.client.clone(),
                budget: self.money(project.budget),
                deadline: project.deadline.clone(),
                status: project.status.to_string(),
            })
            .collect();
        Self::table(rows, "No projects.")
    }

    pub fn tasks(&self, tasks: &[Task]) -> String {
        let rows = tasks
            .iter()
            .map(|task| TaskRow {
                id: task.id.clone(),
                name: task.name.clone(),
                contractor: task.contractor_name.clone().unwrap_or_else(|| "-".to_string()),
                contract_value: self.money(task.contract_value),
                status: task.status.to_string(),
                progress: format!("{}%", task.progress),
            })
            .collect();
        Self::table(rows, "No tasks.")
    }

    pub fn transactions(&self, transactions: &[Transaction]) -> String {
        let rows = transactions
            .iter()
            .map(|transaction| TransactionRow {
                date: transaction.date.clone(),
                reference: transaction.reference.clone(),
                description: transaction.description.clone(),
                amount: self.money(transaction.amount),
                method: transaction.payment_method.to_string(),
                status: transaction.status.to_string(),
                task: transaction
                    .linked_task_id
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        Self::table(rows, "No transactions.")
    }

    pub fn documents(&self, documents: &[ProjectDocument]) -> String {
        let rows = documents
            .iter()
            .map(|document| DocumentRow {
                id: document.id.clone(),
                name: document.name.clone(),
                category: format!("{} / {}", document.main_category, document.sub_category),
                size: document.size_label(),
                uploaded_by: document.uploaded_by.clone(),
            })
            .collect();
        Self::table(rows, "No documents.")
    }

    pub fn project_summary(&self, summary: &ProjectSummary) -> String {
        let project = &summary.project;
        let mut lines = vec![
            format!("{} ({})", project.name, project.id),
            format!("Client:           {}", project.client),
            format!("Status:           {}", project.status),
            format!("Deadline:         {}", project.deadline),
            format!("Budget:           {}", self.money(project.budget)),
            format!("Spent:            {}", self.money(summary.total_spent)),
            format!("Received:         {}", self.money(summary.total_received)),
            format!("Budget remaining: {}", self.money(summary.budget_remaining)),
            format!(
                "Tasks:            {} ({} pending, {} in progress, {} completed)",
                summary.task_count,
                summary.pending_tasks,
                summary.in_progress_tasks,
                summary.completed_tasks
            ),
            format!(
                "Contracted:       {}",
                self.money(summary.total_contract_value)
            ),
            format!("Transactions:     {}", summary.transaction_count),
            format!("Documents:        {}", summary.document_count),
        ];
        if let Some(team) = project.team {
            lines.insert(3, format!("Team:             {team}"));
        }
        lines.join("\n")
    }

    pub fn task_payments(&self, payments: &TaskPayments) -> String {
        let task = &payments.task;
        let summary = &payments.summary;
        let mut lines = vec![
            format!("{} ({})", task.name, task.id),
            format!(
                "Status:    {} ({}%)",
                self.palette.task_status(task.status),
                task.progress
            ),
        ];
        if let Some(contractor) = task.contractor_name.as_deref() {
            let company = task
                .company_name
                .as_deref()
                .map(|company| format!(", {company}"))
                .unwrap_or_default();
            lines.push(format!("Contractor: {contractor}{company}"));
        }
        if let Some(duration) = task.duration {
            let start = task.start_date.as_deref().unwrap_or("unscheduled");
            lines.push(format!(
                "Schedule:  {start}, {} {}",
                duration.amount, duration.unit
            ));
        }
        lines.push(format!("Contract:  {}", self.money(summary.contract_value)));
        lines.push(format!(
            "Paid:      {} ({:.1}%)",
            self.money(summary.total_paid),
            summary.payment_percent()
        ));
        lines.push(format!("Remaining: {}", self.money(summary.remaining_balance)));
        lines.push(String::new());
        lines.push(self.transactions(&payments.transactions));
        lines.join("\n")
    }

    pub fn recorded(&self, recorded: &RecordedTransaction) -> String {
        let transaction = &recorded.transaction;
        let mut message = format!(
            "Recorded transaction {} ({}) for {}",
            transaction.reference,
            transaction.id,
            self.money(transaction.amount)
        );
        if let Some(transition) = recorded.task_transition.as_ref() {
            message.push('\n');
            message.push_str(&self.transition(transition, "Task"));
        }
        message
    }

    pub fn transition(&self, transition: &TaskTransition, label: &str) -> String {
        let current = format!(
            "{} ({}%)",
            self.palette.task_status(transition.current.status),
            transition.current.progress
        );
        if transition.changed() {
            format!(
                "{label} {}: {} ({}%) -> {current}",
                transition.task.id,
                self.palette.mutedize(transition.previous.status.as_str()),
                transition.previous.progress
            )
        } else {
            format!("{label} {}: unchanged at {current}", transition.task.id)
        }
    }
}

pub fn transition_json(transition: &TaskTransition) -> serde_json::Value {
    serde_json::json!({
        "task_id": transition.task.id,
        "previous_status": transition.previous.status,
        "previous_progress": transition.previous.progress,
        "status": transition.current.status,
        "progress": transition.current.progress,
        "changed": transition.changed(),
    })
}

pub fn recorded_json(recorded: &RecordedTransaction) -> serde_json::Value {
    serde_json::json!({
        "transaction": recorded.transaction,
        "task": recorded.task_transition.as_ref().map(transition_json),
    })
}

pub fn task_payments_json(payments: &TaskPayments) -> serde_json::Value {
    let summary = &payments.summary;
    serde_json::json!({
        "task": payments.task,
        "total_paid": summary.total_paid,
        "remaining_balance": summary.remaining_balance,
        "payment_percent": summary.payment_percent(),
        "transactions": payments.transactions,
    })
}

pub fn project_summary_json(summary: &ProjectSummary) -> serde_json::Value {
    serde_json::json!({
        "project": summary.project,
        "task_count": summary.task_count,
        "pending_tasks": summary.pending_tasks,
        "in_progress_tasks": summary.in_progress_tasks,
        "completed_tasks": summary.completed_tasks,
        "total_contract_value": summary.total_contract_value,
        "total_spent": summary.total_spent,
        "total_received": summary.total_received,
        "budget_remaining": summary.budget_remaining,
        "transaction_count": summary.transaction_count,
        "document_count": summary.document_count,
    })
}
