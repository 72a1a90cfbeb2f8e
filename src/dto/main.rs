use crate::domain::activity::ActivityEntry;
use crate::domain::reminder::Reminder;
use crate::dto::opportunities::StageSummary;

/// Data required to render the dashboard template.
pub struct DashboardPageData {
    pub contact_total: usize,
    pub company_total: usize,
    pub pipeline: Vec<StageSummary>,
    /// Open reminders due today for the signed-in user.
    pub due_today: Vec<Reminder>,
    pub recent_activity: Vec<ActivityEntry>,
}
