use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::contact::Contact;
use crate::domain::reminder::Reminder;

/// Query parameters accepted by the calendar page. Defaults to the current
/// month when absent.
#[derive(Debug, Default)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// One rendered calendar cell.
#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing cells that pad the first and last week.
    pub in_month: bool,
    pub today: bool,
    pub reminders: Vec<Reminder>,
}

/// Data required to render the monthly calendar template.
pub struct CalendarPageData {
    pub year: i32,
    pub month: u32,
    /// Monday-first weeks covering the month.
    pub weeks: Vec<Vec<CalendarDay>>,
    pub prev: (i32, u32),
    pub next: (i32, u32),
    /// Contacts offered by the add-reminder form.
    pub contacts: Vec<Contact>,
}
