use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitrepError {
    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("A report already exists for period end date {0}")]
    DuplicateReport(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SitrepError>;
