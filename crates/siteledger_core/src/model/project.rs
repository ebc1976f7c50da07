use crate::model::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client: String,
    pub budget: Money,
    pub deadline: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub team: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Completed,
    OnHold,
}

labelled_enum!(ProjectStatus, "project status" {
    InProgress => "in-progress",
    Completed => "completed",
    OnHold => "on-hold",
});
