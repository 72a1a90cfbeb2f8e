//! Repository implementation for opportunities and the kanban board.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::opportunity::{NewOpportunity, Opportunity, Stage, StageMove, UpdateOpportunity},
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, OpportunityListQuery, OpportunityReader, OpportunityWriter},
};

impl OpportunityReader for DieselRepository {
    fn get_opportunity_by_id(&self, id: i32) -> RepositoryResult<Option<Opportunity>> {
        use crate::models::opportunity::Opportunity as DbOpportunity;
        use crate::schema::opportunities;

        let mut conn = self.conn()?;
        let opportunity = opportunities::table
            .find(id)
            .first::<DbOpportunity>(&mut conn)
            .optional()?;

        Ok(opportunity.map(Into::into))
    }

    fn list_opportunities(
        &self,
        query: OpportunityListQuery,
    ) -> RepositoryResult<(usize, Vec<Opportunity>)> {
        use crate::models::opportunity::Opportunity as DbOpportunity;
        use crate::schema::opportunities;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = opportunities::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(owner_id) = query.owner_id {
                items = items.filter(opportunities::owner_id.eq(owner_id));
            }
            if let Some(company_id) = query.company_id {
                items = items.filter(opportunities::company_id.eq(company_id));
            }
            if let Some(stage) = query.stage {
                items = items.filter(opportunities::stage.eq(stage.to_string()));
            } else if !query.include_terminal {
                items = items.filter(
                    opportunities::stage
                        .ne(Stage::Won.to_string())
                        .and(opportunities::stage.ne(Stage::Lost.to_string())),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            query_builder().order((opportunities::stage.asc(), opportunities::position.asc()));
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let opportunities = items
            .load::<DbOpportunity>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, opportunities))
    }

    fn pipeline_summary(
        &self,
        owner_id: Option<i32>,
    ) -> RepositoryResult<Vec<(Stage, usize, i64)>> {
        use crate::models::opportunity::Opportunity as DbOpportunity;
        use crate::schema::opportunities;

        let mut conn = self.conn()?;
        let mut items = opportunities::table.into_boxed();
        if let Some(owner_id) = owner_id {
            items = items.filter(opportunities::owner_id.eq(owner_id));
        }
        let rows = items.load::<DbOpportunity>(&mut conn)?;

        let mut summary: Vec<(Stage, usize, i64)> = Vec::new();
        for stage in [
            Stage::Lead,
            Stage::Qualified,
            Stage::Proposal,
            Stage::Negotiation,
            Stage::Won,
            Stage::Lost,
        ] {
            let matching = rows
                .iter()
                .filter(|row| Stage::from(row.stage.as_str()) == stage);
            let count = matching.clone().count();
            let amount = matching.map(|row| row.amount_cents).sum();
            summary.push((stage, count, amount));
        }

        Ok(summary)
    }
}

impl OpportunityWriter for DieselRepository {
    fn create_opportunity(
        &self,
        new_opportunity: &NewOpportunity,
    ) -> RepositoryResult<Opportunity> {
        use crate::models::opportunity::{
            NewOpportunity as DbNewOpportunity, Opportunity as DbOpportunity,
        };
        use crate::schema::opportunities;

        let mut conn = self.conn()?;

        // New cards go to the end of their column.
        let next_position = opportunities::table
            .filter(opportunities::stage.eq(new_opportunity.stage.to_string()))
            .select(diesel::dsl::max(opportunities::position))
            .get_result::<Option<i32>>(&mut conn)?
            .map_or(0, |max| max + 1);

        let insertable = DbNewOpportunity::from_domain(new_opportunity, next_position);

        let created = diesel::insert_into(opportunities::table)
            .values(&insertable)
            .get_result::<DbOpportunity>(&mut conn)?;

        Ok(created.into())
    }

    fn update_opportunity(
        &self,
        opportunity_id: i32,
        updates: &UpdateOpportunity,
    ) -> RepositoryResult<Opportunity> {
        use crate::models::opportunity::{
            Opportunity as DbOpportunity, UpdateOpportunity as DbUpdateOpportunity,
        };
        use crate::schema::opportunities;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateOpportunity::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(opportunities::table.find(opportunity_id))
            .set(&db_updates)
            .get_result::<DbOpportunity>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_opportunity(&self, opportunity_id: i32) -> RepositoryResult<()> {
        use crate::schema::{opportunities, reminders};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::update(reminders::table.filter(reminders::opportunity_id.eq(opportunity_id)))
                .set(reminders::opportunity_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(opportunities::table.find(opportunity_id)).execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }

    fn move_opportunity(&self, movement: &StageMove) -> RepositoryResult<Opportunity> {
        use crate::models::opportunity::Opportunity as DbOpportunity;
        use crate::schema::opportunities;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let moved = conn.transaction::<DbOpportunity, diesel::result::Error, _>(|conn| {
            // Sibling cards of the target column, without the moving card.
            let mut siblings = opportunities::table
                .filter(opportunities::stage.eq(movement.stage.to_string()))
                .filter(opportunities::id.ne(movement.opportunity_id))
                .order(opportunities::position.asc())
                .select(opportunities::id)
                .load::<i32>(conn)?;

            let slot = (movement.position.max(0) as usize).min(siblings.len());
            siblings.insert(slot, movement.opportunity_id);

            // Dense re-numbering keeps drag-and-drop idempotent.
            for (position, id) in siblings.iter().enumerate() {
                if *id == movement.opportunity_id {
                    diesel::update(opportunities::table.find(id))
                        .set((
                            opportunities::stage.eq(movement.stage.to_string()),
                            opportunities::position.eq(position as i32),
                            opportunities::updated_at.eq(now),
                        ))
                        .execute(conn)?;
                } else {
                    diesel::update(opportunities::table.find(id))
                        .set(opportunities::position.eq(position as i32))
                        .execute(conn)?;
                }
            }

            opportunities::table
                .find(movement.opportunity_id)
                .first::<DbOpportunity>(conn)
        })?;

        if Stage::from(moved.stage.as_str()) != movement.stage {
            return Err(RepositoryError::Unexpected(
                "Stage move was not applied".to_string(),
            ));
        }

        Ok(moved.into())
    }
}
