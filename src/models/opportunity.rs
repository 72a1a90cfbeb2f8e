use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::opportunity::{
    NewOpportunity as DomainNewOpportunity, Opportunity as DomainOpportunity, Stage,
    UpdateOpportunity as DomainUpdateOpportunity,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::opportunities)]
/// Diesel model for [`crate::domain::opportunity::Opportunity`]. The stage is
/// stored as text and parsed back on the way out.
pub struct Opportunity {
    pub id: i32,
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub owner_id: i32,
    pub title: String,
    pub amount_cents: i64,
    pub stage: String,
    pub position: i32,
    pub expected_close: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::opportunities)]
pub struct NewOpportunity<'a> {
    pub company_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub owner_id: i32,
    pub title: &'a str,
    pub amount_cents: i64,
    pub stage: String,
    pub position: i32,
    pub expected_close: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::opportunities)]
pub struct UpdateOpportunity<'a> {
    pub company_id: Option<Option<i32>>,
    pub contact_id: Option<Option<i32>>,
    pub title: &'a str,
    pub amount_cents: i64,
    pub expected_close: Option<Option<NaiveDate>>,
    pub updated_at: NaiveDateTime,
}

impl From<Opportunity> for DomainOpportunity {
    fn from(opportunity: Opportunity) -> Self {
        Self {
            id: opportunity.id,
            company_id: opportunity.company_id,
            contact_id: opportunity.contact_id,
            owner_id: opportunity.owner_id,
            title: opportunity.title,
            amount_cents: opportunity.amount_cents,
            stage: Stage::from(opportunity.stage),
            position: opportunity.position,
            expected_close: opportunity.expected_close,
            created_at: opportunity.created_at,
            updated_at: opportunity.updated_at,
        }
    }
}

impl<'a> NewOpportunity<'a> {
    pub fn from_domain(opportunity: &'a DomainNewOpportunity, position: i32) -> Self {
        Self {
            company_id: opportunity.company_id,
            contact_id: opportunity.contact_id,
            owner_id: opportunity.owner_id,
            title: opportunity.title.as_str(),
            amount_cents: opportunity.amount_cents,
            stage: opportunity.stage.to_string(),
            position,
            expected_close: opportunity.expected_close,
        }
    }
}

impl<'a> UpdateOpportunity<'a> {
    pub fn from_domain(updates: &'a DomainUpdateOpportunity, updated_at: NaiveDateTime) -> Self {
        Self {
            company_id: Some(updates.company_id),
            contact_id: Some(updates.contact_id),
            title: updates.title.as_str(),
            amount_cents: updates.amount_cents,
            expected_close: Some(updates.expected_close),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn opportunity_into_domain_parses_stage() {
        let now = Utc::now().naive_utc();
        let db = Opportunity {
            id: 1,
            company_id: None,
            contact_id: Some(2),
            owner_id: 3,
            title: "Deal".to_string(),
            amount_cents: 125_000,
            stage: "Proposal".to_string(),
            position: 0,
            expected_close: None,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainOpportunity = db.into();
        assert_eq!(domain.stage, Stage::Proposal);
        assert_eq!(domain.amount_cents, 125_000);
    }
}
