use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Opportunity {
    pub id: i32,
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub owner_id: i32,
    pub title: String,
    pub amount_cents: i64,
    pub stage: Stage,
    /// Ordering of the card within its kanban column.
    pub position: i32,
    pub expected_close: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Pipeline stage of an opportunity. `Won` and `Lost` are terminal and are
/// not shown on the kanban board.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Stage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl Stage {
    /// Stages rendered as kanban columns, in board order.
    pub const BOARD: [Stage; 4] = [
        Stage::Lead,
        Stage::Qualified,
        Stage::Proposal,
        Stage::Negotiation,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Won | Stage::Lost)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Lead => write!(f, "Lead"),
            Stage::Qualified => write!(f, "Qualified"),
            Stage::Proposal => write!(f, "Proposal"),
            Stage::Negotiation => write!(f, "Negotiation"),
            Stage::Won => write!(f, "Won"),
            Stage::Lost => write!(f, "Lost"),
        }
    }
}

impl From<&str> for Stage {
    fn from(s: &str) -> Self {
        match s {
            "Qualified" => Stage::Qualified,
            "Proposal" => Stage::Proposal,
            "Negotiation" => Stage::Negotiation,
            "Won" => Stage::Won,
            "Lost" => Stage::Lost,
            // Unknown values land cards back at the start of the pipeline.
            _ => Stage::Lead,
        }
    }
}

impl From<String> for Stage {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewOpportunity {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub owner_id: i32,
    pub title: String,
    pub amount_cents: i64,
    pub stage: Stage,
    pub expected_close: Option<NaiveDate>,
}

impl NewOpportunity {
    #[must_use]
    pub fn new(
        company_id: Option<i32>,
        contact_id: Option<i32>,
        owner_id: i32,
        title: String,
        amount_cents: i64,
        stage: Stage,
        expected_close: Option<NaiveDate>,
    ) -> Self {
        Self {
            company_id,
            contact_id,
            owner_id,
            title: title.trim().to_string(),
            amount_cents: amount_cents.max(0),
            stage,
            expected_close,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateOpportunity {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub title: String,
    pub amount_cents: i64,
    pub expected_close: Option<NaiveDate>,
}

impl UpdateOpportunity {
    #[must_use]
    pub fn new(
        company_id: Option<i32>,
        contact_id: Option<i32>,
        title: String,
        amount_cents: i64,
        expected_close: Option<NaiveDate>,
    ) -> Self {
        Self {
            company_id,
            contact_id,
            title: title.trim().to_string(),
            amount_cents: amount_cents.max(0),
            expected_close,
        }
    }
}

/// Requested card placement produced by a kanban drag-and-drop.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StageMove {
    pub opportunity_id: i32,
    pub stage: Stage,
    /// Zero-based slot in the target column; clamped to the column length.
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trips_through_strings() {
        for stage in [
            Stage::Lead,
            Stage::Qualified,
            Stage::Proposal,
            Stage::Negotiation,
            Stage::Won,
            Stage::Lost,
        ] {
            assert_eq!(Stage::from(stage.to_string()), stage);
        }
    }

    #[test]
    fn unknown_stage_falls_back_to_lead() {
        assert_eq!(Stage::from("Archived"), Stage::Lead);
    }

    #[test]
    fn terminal_stages_are_off_the_board() {
        assert!(Stage::Won.is_terminal());
        assert!(Stage::Lost.is_terminal());
        assert!(!Stage::BOARD.iter().any(|s| s.is_terminal()));
    }

    #[test]
    fn negative_amounts_are_clamped() {
        let opp = NewOpportunity::new(None, None, 1, "Deal".into(), -500, Stage::Lead, None);
        assert_eq!(opp.amount_cents, 0);
    }
}
