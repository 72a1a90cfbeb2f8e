use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Document {
    pub id: i32,
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    /// Name of the stored file inside the uploads directory (a UUID with the
    /// original extension), not the name the user uploaded.
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDocument {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
}

impl NewDocument {
    #[must_use]
    pub fn new(
        company_id: Option<i32>,
        contact_id: Option<i32>,
        uploaded_by: i32,
        title: String,
        file_name: String,
        content_type: String,
        size_bytes: i64,
    ) -> Self {
        Self {
            company_id,
            contact_id,
            uploaded_by,
            title: title.trim().to_string(),
            file_name,
            content_type,
            size_bytes,
        }
    }
}
