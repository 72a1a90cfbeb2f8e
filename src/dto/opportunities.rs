use serde::Serialize;

use crate::domain::company::Company;
use crate::domain::contact::Contact;
use crate::domain::opportunity::{Opportunity, Stage};

/// One kanban column with its cards in board order.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub stage: Stage,
    /// Sum of the card amounts, shown in the column header.
    pub total_cents: i64,
    pub opportunities: Vec<Opportunity>,
}

/// Data required to render the kanban board template.
pub struct BoardPageData {
    pub columns: Vec<BoardColumn>,
    /// Companies offered by the add-opportunity form.
    pub companies: Vec<Company>,
    /// Contacts offered by the add-opportunity form.
    pub contacts: Vec<Contact>,
}

/// Per-stage rollup shown on the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageSummary {
    pub stage: Stage,
    pub count: usize,
    pub amount_cents: i64,
}
