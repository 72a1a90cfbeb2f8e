use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact, UpdateContact as DomainUpdateContact,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::contacts)]
/// Diesel model for [`crate::domain::contact::Contact`].
pub struct Contact {
    pub id: i32,
    pub company_id: Option<i32>,
    pub owner_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
/// Insertable form of [`Contact`].
pub struct NewContact<'a> {
    pub company_id: Option<i32>,
    pub owner_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
    pub address: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Contact`] record.
pub struct UpdateContact<'a> {
    pub company_id: Option<i32>,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Contact> for DomainContact {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            company_id: contact.company_id,
            owner_id: contact.owner_id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            position: contact.position,
            address: contact.address,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewContact> for NewContact<'a> {
    fn from(contact: &'a DomainNewContact) -> Self {
        Self {
            company_id: contact.company_id,
            owner_id: contact.owner_id,
            name: contact.name.as_str(),
            email: contact.email.as_deref(),
            phone: contact.phone.as_deref(),
            position: contact.position.as_deref(),
            address: contact.address.as_deref(),
        }
    }
}

impl<'a> UpdateContact<'a> {
    pub fn from_domain(updates: &'a DomainUpdateContact, updated_at: NaiveDateTime) -> Self {
        Self {
            company_id: updates.company_id,
            name: updates.name.as_str(),
            email: updates.email.as_deref(),
            phone: updates.phone.as_deref(),
            position: updates.position.as_deref(),
            address: updates.address.as_deref(),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn from_domain_new_creates_insertable() {
        let domain = DomainNewContact::new(
            Some(3),
            1,
            "John".to_string(),
            Some("john@example.com".to_string()),
            Some("123".to_string()),
            None,
            Some("addr".to_string()),
        );
        let new: NewContact = (&domain).into();
        assert_eq!(new.company_id, Some(3));
        assert_eq!(new.owner_id, 1);
        assert_eq!(new.name, "John");
        assert_eq!(new.email, Some("john@example.com"));
        assert_eq!(new.position, None);
    }

    #[test]
    fn contact_into_domain() {
        let now = Utc::now().naive_utc();
        let db_contact = Contact {
            id: 1,
            company_id: None,
            owner_id: 2,
            name: "n".to_string(),
            email: Some("e@example.com".to_string()),
            phone: None,
            position: Some("CTO".to_string()),
            address: None,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainContact = db_contact.into();
        assert_eq!(domain.id, 1);
        assert_eq!(domain.owner_id, 2);
        assert_eq!(domain.position.as_deref(), Some("CTO"));
        assert_eq!(domain.created_at, now);
    }
}
