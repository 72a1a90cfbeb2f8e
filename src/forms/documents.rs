use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

#[derive(MultipartForm)]
/// Multipart payload for attaching a document to a contact or company.
pub struct UploadDocumentForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
    pub title: Text<String>,
    pub company_id: Option<Text<i32>>,
    pub contact_id: Option<Text<i32>>,
}
