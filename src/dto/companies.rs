use crate::domain::company::Company;
use crate::domain::contact::Contact;
use crate::domain::document::Document;
use crate::domain::opportunity::Opportunity;
use crate::pagination::Paginated;

/// Query parameters accepted by the companies list page.
#[derive(Debug, Default)]
pub struct CompaniesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the companies list template.
pub struct CompaniesPageData {
    pub companies: Paginated<Company>,
    pub search_query: Option<String>,
}

/// Data required to render a single company card.
pub struct CompanyPageData {
    pub company: Company,
    pub contacts: Vec<Contact>,
    pub opportunities: Vec<Opportunity>,
    pub documents: Vec<Document>,
}
