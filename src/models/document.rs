use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::document::{Document as DomainDocument, NewDocument as DomainNewDocument};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::documents)]
pub struct Document {
    pub id: i32,
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocument<'a> {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
}

impl From<Document> for DomainDocument {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            company_id: document.company_id,
            contact_id: document.contact_id,
            uploaded_by: document.uploaded_by,
            title: document.title,
            file_name: document.file_name,
            content_type: document.content_type,
            size_bytes: document.size_bytes,
            created_at: document.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewDocument> for NewDocument<'a> {
    fn from(document: &'a DomainNewDocument) -> Self {
        Self {
            company_id: document.company_id,
            contact_id: document.contact_id,
            uploaded_by: document.uploaded_by,
            title: document.title.as_str(),
            file_name: document.file_name.as_str(),
            content_type: document.content_type.as_str(),
            size_bytes: document.size_bytes,
        }
    }
}
