use crate::domain::activity::ActivityEntry;
use crate::domain::company::Company;
use crate::domain::contact::Contact;
use crate::domain::document::Document;
use crate::domain::reminder::Reminder;
use crate::pagination::Paginated;

/// Query parameters accepted by the contacts list page.
#[derive(Debug, Default)]
pub struct ContactsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the contacts list template.
pub struct ContactsPageData {
    /// Paginated page of contacts to show in the table.
    pub contacts: Paginated<Contact>,
    /// Companies offered by the add-contact form.
    pub companies: Vec<Company>,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
}

/// Data required to render a single contact card.
pub struct ContactPageData {
    pub contact: Contact,
    pub company: Option<Company>,
    /// Companies offered by the edit form.
    pub companies: Vec<Company>,
    pub documents: Vec<Document>,
    pub reminders: Vec<Reminder>,
    pub activity: Vec<ActivityEntry>,
}
