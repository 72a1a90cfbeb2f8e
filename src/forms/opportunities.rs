use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::opportunity::{NewOpportunity, Stage, StageMove, UpdateOpportunity};

#[derive(Deserialize, Validate)]
/// Form data for creating an opportunity.
pub struct AddOpportunityForm {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    #[validate(length(min = 1))]
    pub title: String,
    /// Amount in major currency units, as typed into the form.
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub stage: Option<String>,
    pub expected_close: Option<NaiveDate>,
}

impl AddOpportunityForm {
    pub fn into_new_opportunity(self, owner_id: i32) -> NewOpportunity {
        let stage = self.stage.as_deref().map(Stage::from).unwrap_or(Stage::Lead);
        NewOpportunity::new(
            self.company_id,
            self.contact_id,
            owner_id,
            self.title,
            to_cents(self.amount),
            stage,
            self.expected_close,
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing opportunity.
pub struct SaveOpportunityForm {
    pub id: i32,
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub expected_close: Option<NaiveDate>,
}

impl From<SaveOpportunityForm> for UpdateOpportunity {
    fn from(form: SaveOpportunityForm) -> Self {
        UpdateOpportunity::new(
            form.company_id,
            form.contact_id,
            form.title,
            to_cents(form.amount),
            form.expected_close,
        )
    }
}

#[derive(Deserialize)]
/// Card placement posted by the board's drag-and-drop handler.
pub struct MoveOpportunityForm {
    pub id: i32,
    pub stage: String,
    pub position: i32,
}

impl From<&MoveOpportunityForm> for StageMove {
    fn from(form: &MoveOpportunityForm) -> Self {
        StageMove {
            opportunity_id: form.id,
            stage: form.stage.as_str().into(),
            position: form.position.max(0),
        }
    }
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_converts_to_cents() {
        assert_eq!(to_cents(12.34), 1234);
        assert_eq!(to_cents(0.005), 1);
        assert_eq!(to_cents(0.0), 0);
    }

    #[test]
    fn move_form_clamps_negative_positions() {
        let form = MoveOpportunityForm {
            id: 7,
            stage: "Proposal".to_string(),
            position: -3,
        };
        let movement = StageMove::from(&form);
        assert_eq!(movement.stage, Stage::Proposal);
        assert_eq!(movement.position, 0);
    }
}
