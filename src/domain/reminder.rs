use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::normalize_opt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
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

#[derive(Clone, Debug, Deserialize)]
pub struct NewReminder {
    pub user_id: i32,
    pub contact_id: Option<i32>,
    pub opportunity_id: Option<i32>,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: NaiveDateTime,
}

impl NewReminder {
    #[must_use]
    pub fn new(
        user_id: i32,
        contact_id: Option<i32>,
        opportunity_id: Option<i32>,
        title: String,
        notes: Option<String>,
        due_at: NaiveDateTime,
    ) -> Self {
        Self {
            user_id,
            contact_id,
            opportunity_id,
            title: title.trim().to_string(),
            // Notes may come from a rich-text widget.
            notes: normalize_opt(notes.map(|n| ammonia::clean(&n))),
            due_at,
        }
    }
}
