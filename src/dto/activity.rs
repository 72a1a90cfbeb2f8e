use crate::domain::activity::ActivityEntry;
use crate::pagination::Paginated;

/// Query parameters accepted by the activity log page.
#[derive(Debug, Default)]
pub struct ActivityQuery {
    pub page: Option<usize>,
}

/// Data required to render the activity log template.
pub struct ActivityPageData {
    pub entries: Paginated<ActivityEntry>,
}
