//! Repository implementation for calendar reminders.

use diesel::prelude::*;

use crate::{
    domain::reminder::{NewReminder, Reminder},
    repository::errors::RepositoryResult,
    repository::{DieselRepository, ReminderListQuery, ReminderReader, ReminderWriter},
};

impl ReminderReader for DieselRepository {
    fn get_reminder_by_id(&self, id: i32) -> RepositoryResult<Option<Reminder>> {
        use crate::models::reminder::Reminder as DbReminder;
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let reminder = reminders::table
            .find(id)
            .first::<DbReminder>(&mut conn)
            .optional()?;

        Ok(reminder.map(Into::into))
    }

    fn list_reminders(&self, query: ReminderListQuery) -> RepositoryResult<Vec<Reminder>> {
        use crate::models::reminder::Reminder as DbReminder;
        use crate::schema::reminders;

        let mut conn = self.conn()?;

        let mut items = reminders::table
            .filter(reminders::user_id.eq(query.user_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some((from, until)) = query.range {
            items = items.filter(reminders::due_at.ge(from).and(reminders::due_at.lt(until)));
        }
        if !query.include_done {
            items = items.filter(reminders::done.eq(false));
        }
        if let Some(contact_id) = query.contact_id {
            items = items.filter(reminders::contact_id.eq(contact_id));
        }

        let reminders = items
            .order(reminders::due_at.asc())
            .load::<DbReminder>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(reminders)
    }
}

impl ReminderWriter for DieselRepository {
    fn create_reminder(&self, new_reminder: &NewReminder) -> RepositoryResult<Reminder> {
        use crate::models::reminder::{NewReminder as DbNewReminder, Reminder as DbReminder};
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let insertable: DbNewReminder = new_reminder.into();

        let created = diesel::insert_into(reminders::table)
            .values(&insertable)
            .get_result::<DbReminder>(&mut conn)?;

        Ok(created.into())
    }

    fn set_reminder_done(&self, reminder_id: i32, done: bool) -> RepositoryResult<Reminder> {
        use crate::models::reminder::Reminder as DbReminder;
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let updated = diesel::update(reminders::table.find(reminder_id))
            .set(reminders::done.eq(done))
            .get_result::<DbReminder>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_reminder(&self, reminder_id: i32) -> RepositoryResult<()> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        diesel::delete(reminders::table.find(reminder_id)).execute(&mut conn)?;
        Ok(())
    }
}
