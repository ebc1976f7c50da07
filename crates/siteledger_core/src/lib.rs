pub mod config;
pub mod error;
pub mod ledger_api;
pub mod model;
pub mod reconcile;
pub mod reference;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Money, Task, TaskStatus};

    #[test]
    fn task_serializes_with_kebab_status_and_minor_units() {
        let task = Task {
            id: "task-1".to_string(),
            project_id: "project-1".to_string(),
            name: "Electrical Work".to_string(),
            category: Some("Electrical".to_string()),
            contractor_name: None,
            company_name: None,
            contact_email: None,
            contact_phone: None,
            start_date: None,
            duration: None,
            contract_value: Money::parse("12,500.75").unwrap(),
            estimated_cost: None,
            status: TaskStatus::InProgress,
            progress: 12,
            created_at: "2026-01-05T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["contract_value"], 1_250_075);

        let parsed: Task = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing name");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing name");

        let err = AppError::not_found("task", "task-9");
        assert_eq!(err.to_string(), "not_found - task 'task-9' not found");
    }
}
