//! Form definitions backing the CRM routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod calendar;
pub mod companies;
pub mod contacts;
pub mod documents;
pub mod opportunities;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid date or time")]
    InvalidDate,

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}
