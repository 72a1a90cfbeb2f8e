//! Repository implementation for uploaded documents.

use diesel::prelude::*;

use crate::{
    domain::document::{Document, NewDocument},
    repository::errors::RepositoryResult,
    repository::{DieselRepository, DocumentReader, DocumentWriter},
};

impl DocumentReader for DieselRepository {
    fn get_document_by_id(&self, id: i32) -> RepositoryResult<Option<Document>> {
        use crate::models::document::Document as DbDocument;
        use crate::schema::documents;

        let mut conn = self.conn()?;
        let document = documents::table
            .find(id)
            .first::<DbDocument>(&mut conn)
            .optional()?;

        Ok(document.map(Into::into))
    }

    fn list_contact_documents(&self, contact_id: i32) -> RepositoryResult<Vec<Document>> {
        use crate::models::document::Document as DbDocument;
        use crate::schema::documents;

        let mut conn = self.conn()?;
        let documents = documents::table
            .filter(documents::contact_id.eq(contact_id))
            .order(documents::created_at.desc())
            .load::<DbDocument>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(documents)
    }

    fn list_company_documents(&self, company_id: i32) -> RepositoryResult<Vec<Document>> {
        use crate::models::document::Document as DbDocument;
        use crate::schema::documents;

        let mut conn = self.conn()?;
        let documents = documents::table
            .filter(documents::company_id.eq(company_id))
            .order(documents::created_at.desc())
            .load::<DbDocument>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(documents)
    }
}

impl DocumentWriter for DieselRepository {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document> {
        use crate::models::document::{Document as DbDocument, NewDocument as DbNewDocument};
        use crate::schema::documents;

        let mut conn = self.conn()?;
        let insertable: DbNewDocument = new_document.into();

        let created = diesel::insert_into(documents::table)
            .values(&insertable)
            .get_result::<DbDocument>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_document(&self, document_id: i32) -> RepositoryResult<()> {
        use crate::schema::documents;

        let mut conn = self.conn()?;
        diesel::delete(documents::table.find(document_id)).execute(&mut conn)?;
        Ok(())
    }
}
