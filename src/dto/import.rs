use crate::domain::import::{ImportFailure, ImportJob};

/// Data required to render the import jobs list.
pub struct ImportJobsPageData {
    pub jobs: Vec<ImportJob>,
}

/// Data required to render a single import job with its failure report.
pub struct ImportJobPageData {
    pub job: ImportJob,
    pub failures: Vec<ImportFailure>,
}
