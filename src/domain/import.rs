use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImportJob {
    pub id: i32,
    pub created_by: i32,
    pub file_name: String,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub cancelled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ImportJob {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            ImportStatus::Completed | ImportStatus::Failed | ImportStatus::Cancelled
        )
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStatus::Pending => write!(f, "Pending"),
            ImportStatus::Running => write!(f, "Running"),
            ImportStatus::Completed => write!(f, "Completed"),
            ImportStatus::Failed => write!(f, "Failed"),
            ImportStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<&str> for ImportStatus {
    fn from(s: &str) -> Self {
        match s {
            "Running" => ImportStatus::Running,
            "Completed" => ImportStatus::Completed,
            "Failed" => ImportStatus::Failed,
            "Cancelled" => ImportStatus::Cancelled,
            _ => ImportStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewImportJob {
    pub created_by: i32,
    pub file_name: String,
    pub total_rows: i32,
}

/// One rejected CSV row kept for the import report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImportFailure {
    pub id: i32,
    pub job_id: i32,
    /// 1-based data row number (the header is row 0).
    pub row_number: i32,
    pub reason: String,
    pub row_data: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewImportFailure {
    pub job_id: i32,
    pub row_number: i32,
    pub reason: String,
    pub row_data: String,
}

/// Parsed CSV row queued for the background worker.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CsvContactRow {
    pub row_number: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
}
