use serde::{Deserialize, Serialize};

/// Metadata for a file attached to a project. The bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub main_category: DocumentCategory,
    pub sub_category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub size_bytes: u64,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

impl ProjectDocument {
    pub fn size_label(&self) -> String {
        size_label(self.size_bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Owner,
    Construction,
    Contractor,
}

labelled_enum!(DocumentCategory, "document category" {
    Owner => "owner",
    Construction => "construction",
    Contractor => "contractor",
});

/// Renders a byte count in megabytes with two decimals.
pub fn size_label(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0))
}
