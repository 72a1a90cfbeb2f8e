use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{normalize_email_opt, normalize_opt};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Contact {
    pub id: i32,
    pub company_id: Option<i32>,
    /// User that owns this contact; sales reps only see their own contacts.
    pub owner_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewContact {
    pub company_id: Option<i32>,
    pub owner_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
}

impl NewContact {
    #[must_use]
    pub fn new(
        company_id: Option<i32>,
        owner_id: i32,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        position: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            company_id,
            owner_id,
            name: name.trim().to_string(),
            email: normalize_email_opt(email),
            phone: normalize_opt(phone),
            position: normalize_opt(position),
            address: normalize_opt(address),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateContact {
    pub company_id: Option<i32>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
}

impl UpdateContact {
    #[must_use]
    pub fn new(
        company_id: Option<i32>,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        position: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            company_id,
            name: name.trim().to_string(),
            email: normalize_email_opt(email),
            phone: normalize_opt(phone),
            position: normalize_opt(position),
            address: normalize_opt(address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contact_normalizes_fields() {
        let contact = NewContact::new(
            None,
            1,
            "  Jane Doe ".to_string(),
            Some(" Jane@Example.COM ".to_string()),
            Some("  ".to_string()),
            None,
            Some(" Main St 1 ".to_string()),
        );
        assert_eq!(contact.name, "Jane Doe");
        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
        assert_eq!(contact.phone, None);
        assert_eq!(contact.address.as_deref(), Some("Main St 1"));
    }
}
