//! Repository implementation for CRM contacts.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::contact::{Contact, NewContact, UpdateContact},
    repository::{ContactListQuery, ContactReader, ContactWriter, DieselRepository},
    repository::errors::RepositoryResult,
};

impl ContactReader for DieselRepository {
    fn get_contact_by_id(&self, id: i32) -> RepositoryResult<Option<Contact>> {
        use crate::models::contact::Contact as DbContact;
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let contact = contacts::table
            .find(id)
            .first::<DbContact>(&mut conn)
            .optional()?;

        Ok(contact.map(Into::into))
    }

    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)> {
        use crate::models::contact::Contact as DbContact;
        use crate::schema::contacts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = contacts::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(owner_id) = query.owner_id {
                items = items.filter(contacts::owner_id.eq(owner_id));
            }
            if let Some(company_id) = query.company_id {
                items = items.filter(contacts::company_id.eq(company_id));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    contacts::name
                        .like(pattern.clone())
                        .or(contacts::email.like(pattern.clone()))
                        .or(contacts::phone.like(pattern.clone()))
                        .or(contacts::address.like(pattern)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(contacts::name.asc());
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let contacts = items
            .load::<DbContact>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, contacts))
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact> {
        use crate::models::contact::{Contact as DbContact, NewContact as DbNewContact};
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let insertable: DbNewContact = new_contact.into();

        let created = diesel::insert_into(contacts::table)
            .values(&insertable)
            .get_result::<DbContact>(&mut conn)?;

        Ok(created.into())
    }

    fn update_contact(
        &self,
        contact_id: i32,
        updates: &UpdateContact,
    ) -> RepositoryResult<Contact> {
        use crate::models::contact::{Contact as DbContact, UpdateContact as DbUpdateContact};
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateContact::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(contacts::table.find(contact_id))
            .set(&db_updates)
            .get_result::<DbContact>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_contact(&self, contact_id: i32) -> RepositoryResult<()> {
        use crate::schema::{contacts, documents, reminders};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(documents::table.filter(documents::contact_id.eq(contact_id)))
                .execute(conn)?;
            diesel::delete(reminders::table.filter(reminders::contact_id.eq(contact_id)))
                .execute(conn)?;
            diesel::delete(contacts::table.find(contact_id)).execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }
}
