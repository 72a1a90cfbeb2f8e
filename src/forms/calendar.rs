use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::reminder::NewReminder;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Form data for scheduling a reminder.
pub struct AddReminderForm {
    #[validate(length(min = 1))]
    pub title: String,
    pub notes: Option<String>,
    /// Value of an `<input type="datetime-local">` widget.
    pub due_at: String,
    pub contact_id: Option<i32>,
    pub opportunity_id: Option<i32>,
}

impl AddReminderForm {
    pub fn into_new_reminder(self, user_id: i32) -> Result<NewReminder, FormError> {
        let due_at = NaiveDateTime::parse_from_str(&self.due_at, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.due_at, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| FormError::InvalidDate)?;

        Ok(NewReminder::new(
            user_id,
            self.contact_id,
            self.opportunity_id,
            self.title,
            self.notes,
            due_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_datetime_local_values() {
        let form = AddReminderForm {
            title: "Call back".to_string(),
            notes: None,
            due_at: "2026-09-01T09:30".to_string(),
            contact_id: None,
            opportunity_id: None,
        };
        let reminder = form.into_new_reminder(1).expect("valid form");
        assert_eq!(reminder.due_at.to_string(), "2026-09-01 09:30:00");
    }

    #[test]
    fn rejects_garbage_dates() {
        let form = AddReminderForm {
            title: "Call back".to_string(),
            notes: None,
            due_at: "next tuesday".to_string(),
            contact_id: None,
            opportunity_id: None,
        };
        assert!(form.into_new_reminder(1).is_err());
    }
}
