use crate::model::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
}

labelled_enum!(DurationUnit, "duration unit" {
    Days => "days",
    Weeks => "weeks",
    Months => "months",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub amount: u32,
    pub unit: DurationUnit,
}

/// A unit of contracted construction work, paid off through linked
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
    pub contract_value: Money,
    #[serde(default)]
    pub estimated_cost: Option<Money>,
    pub status: TaskStatus,
    pub progress: u8,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

labelled_enum!(TaskStatus, "task status" {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
});
