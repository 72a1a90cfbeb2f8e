use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::reminder::{NewReminder as DomainNewReminder, Reminder as DomainReminder};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::reminders)]
pub struct Reminder {
    pub id: i32,
    pub user_id: i32,
    pub contact_id: Option<i32>,
    pub opportunity_id: Option<i32>,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: NaiveDateTime,
    pub done: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reminders)]
pub struct NewReminder<'a> {
    pub user_id: i32,
    pub contact_id: Option<i32>,
    pub opportunity_id: Option<i32>,
    pub title: &'a str,
    pub notes: Option<&'a str>,
    pub due_at: NaiveDateTime,
}

impl From<Reminder> for DomainReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            contact_id: reminder.contact_id,
            opportunity_id: reminder.opportunity_id,
            title: reminder.title,
            notes: reminder.notes,
            due_at: reminder.due_at,
            done: reminder.done,
            created_at: reminder.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewReminder> for NewReminder<'a> {
    fn from(reminder: &'a DomainNewReminder) -> Self {
        Self {
            user_id: reminder.user_id,
            contact_id: reminder.contact_id,
            opportunity_id: reminder.opportunity_id,
            title: reminder.title.as_str(),
            notes: reminder.notes.as_deref(),
            due_at: reminder.due_at,
        }
    }
}
