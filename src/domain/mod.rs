//! Domain aggregates exposed by the CRM service layer.

pub mod activity;
pub mod company;
pub mod contact;
pub mod document;
pub mod import;
pub mod opportunity;
pub mod reminder;
pub mod settings;
pub mod user;

/// Trims a free-form optional field, dropping values that are empty after
/// trimming.
pub(crate) fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Lower-cases and trims an optional email address.
pub(crate) fn normalize_email_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}
