//! Diesel models for the CRM activity log.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::{
    Action, ActivityEntry as DomainActivityEntry, EntityType,
    NewActivityEntry as DomainNewActivityEntry,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct ActivityEntry {
    pub id: i32,
    pub user_id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub details: String, // store JSON text in the DB
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct NewActivityEntry {
    pub user_id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub details: String,
}

impl From<ActivityEntry> for DomainActivityEntry {
    fn from(entry: ActivityEntry) -> Self {
        let details = serde_json::from_str(&entry.details).unwrap_or_default();

        Self {
            id: entry.id,
            user_id: entry.user_id,
            entity_type: EntityType::from(entry.entity_type.as_str()),
            entity_id: entry.entity_id,
            action: Action::from(entry.action.as_str()),
            details,
            created_at: entry.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewActivityEntry> for NewActivityEntry {
    fn from(entry: &'a DomainNewActivityEntry) -> Self {
        Self {
            user_id: entry.user_id,
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            action: entry.action.to_string(),
            details: entry.details.to_string(),
        }
    }
}
