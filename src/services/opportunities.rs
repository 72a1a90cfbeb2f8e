use serde_json::json;
use validator::Validate;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::activity::{Action, EntityType};
use crate::domain::opportunity::{Opportunity, Stage, StageMove, UpdateOpportunity};
use crate::dto::opportunities::{BoardColumn, BoardPageData, StageSummary};
use crate::forms::opportunities::{AddOpportunityForm, MoveOpportunityForm, SaveOpportunityForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ActivityWriter, CompanyListQuery, CompanyReader, ContactListQuery, ContactReader,
    OpportunityListQuery, OpportunityReader, OpportunityWriter, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, activity, ensure_access, ensure_role, sees_all_records, users,
};

/// Loads the kanban board. Terminal stages are not rendered as columns, and
/// sales reps only see their own cards.
pub fn load_board_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<BoardPageData>
where
    R: OpportunityReader + CompanyReader + ContactReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let mut list_query = OpportunityListQuery::new();
    if !sees_all_records(user) {
        list_query = list_query.owner(local_user.id);
    }

    let (_, opportunities) = repo
        .list_opportunities(list_query)
        .map_err(ServiceError::from)?;

    let mut columns: Vec<BoardColumn> = Stage::BOARD
        .into_iter()
        .map(|stage| BoardColumn {
            stage,
            total_cents: 0,
            opportunities: Vec::new(),
        })
        .collect();

    // Rows already arrive ordered by (stage, position).
    for opportunity in opportunities {
        if let Some(column) = columns.iter_mut().find(|c| c.stage == opportunity.stage) {
            column.total_cents += opportunity.amount_cents;
            column.opportunities.push(opportunity);
        }
    }

    let (_, companies) = repo
        .list_companies(CompanyListQuery::new())
        .map_err(ServiceError::from)?;

    let mut contact_query = ContactListQuery::new();
    if !sees_all_records(user) {
        contact_query = contact_query.owner(local_user.id);
    }
    let (_, contacts) = repo
        .list_contacts(contact_query)
        .map_err(ServiceError::from)?;

    Ok(BoardPageData {
        columns,
        companies,
        contacts,
    })
}

/// Validates the add-opportunity form and places a new card at the end of
/// its column.
pub fn add_opportunity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddOpportunityForm,
) -> ServiceResult<Opportunity>
where
    R: OpportunityWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid opportunity form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let new_opportunity = form.into_new_opportunity(local_user.id);

    let opportunity = repo.create_opportunity(&new_opportunity).map_err(|err| {
        log::error!("Failed to add an opportunity: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Opportunity,
        opportunity.id,
        Action::Created,
        json!({ "title": opportunity.title, "stage": opportunity.stage }),
    );

    Ok(opportunity)
}

/// Validates the save-opportunity form and applies the update. The stage is
/// never changed here; that is what [`move_opportunity`] is for.
pub fn save_opportunity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveOpportunityForm,
) -> ServiceResult<Opportunity>
where
    R: OpportunityReader + OpportunityWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid opportunity form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let opportunity_id = form.id;
    get_visible_opportunity(repo, user, local_user.id, opportunity_id)?;

    let updates: UpdateOpportunity = form.into();
    let opportunity = repo
        .update_opportunity(opportunity_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update opportunity: {err}");
            ServiceError::from(err)
        })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Opportunity,
        opportunity.id,
        Action::Updated,
        json!({ "title": opportunity.title }),
    );

    Ok(opportunity)
}

/// Applies a kanban drag-and-drop, or closes a card when the target stage
/// is terminal. The whole move is one transaction in the repository.
pub fn move_opportunity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &MoveOpportunityForm,
) -> ServiceResult<Opportunity>
where
    R: OpportunityReader + OpportunityWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let before = get_visible_opportunity(repo, user, local_user.id, form.id)?;

    let movement: StageMove = form.into();
    let moved = repo.move_opportunity(&movement).map_err(|err| {
        log::error!("Failed to move opportunity: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Opportunity,
        moved.id,
        Action::Moved,
        json!({
            "title": moved.title,
            "from": before.stage,
            "to": moved.stage,
        }),
    );

    Ok(moved)
}

/// Removes an opportunity. Admin only.
pub fn delete_opportunity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    opportunity_id: i32,
) -> ServiceResult<()>
where
    R: OpportunityReader + OpportunityWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let opportunity = repo
        .get_opportunity_by_id(opportunity_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let local_user = users::sync_user(repo, user)?;

    repo.delete_opportunity(opportunity_id).map_err(|err| {
        log::error!("Failed to delete opportunity: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Opportunity,
        opportunity_id,
        Action::Deleted,
        json!({ "title": opportunity.title }),
    );

    Ok(())
}

/// Per-stage counts and totals for the dashboard. Sales reps only see their
/// own pipeline rolled up.
pub fn pipeline_summary<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<StageSummary>>
where
    R: OpportunityReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let owner_id = (!sees_all_records(user)).then_some(local_user.id);

    let summary = repo
        .pipeline_summary(owner_id)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|(stage, count, amount_cents)| StageSummary {
            stage,
            count,
            amount_cents,
        })
        .collect();

    Ok(summary)
}

/// Fetches an opportunity, enforcing the ownership rule for sales reps.
fn get_visible_opportunity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    local_user_id: i32,
    opportunity_id: i32,
) -> ServiceResult<Opportunity>
where
    R: OpportunityReader + ?Sized,
{
    let opportunity = repo
        .get_opportunity_by_id(opportunity_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !sees_all_records(user) && opportunity.owner_id != local_user_id {
        return Err(ServiceError::Unauthorized);
    }

    Ok(opportunity)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, sales_user};
    use chrono::Utc;

    fn stub_sync(repo: &mut MockRepository, id: i32) {
        repo.expect_create_or_update_user().returning(move |new_user| {
            Ok(User {
                id,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
    }

    fn stub_activity(repo: &mut MockRepository) {
        repo.expect_log_activity().returning(|entry| {
            Ok(crate::domain::activity::ActivityEntry {
                id: 1,
                user_id: entry.user_id,
                entity_type: entry.entity_type.clone(),
                entity_id: entry.entity_id,
                action: entry.action.clone(),
                details: entry.details.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
    }

    fn opportunity(id: i32, owner_id: i32, stage: Stage, amount_cents: i64) -> Opportunity {
        Opportunity {
            id,
            company_id: None,
            contact_id: None,
            owner_id,
            title: format!("Deal {id}"),
            amount_cents,
            stage,
            position: 0,
            expected_close: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn board_groups_cards_by_stage() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        repo.expect_list_opportunities().returning(|_| {
            Ok((
                3,
                vec![
                    opportunity(1, 1, Stage::Lead, 1_000),
                    opportunity(2, 1, Stage::Lead, 2_000),
                    opportunity(3, 1, Stage::Proposal, 5_000),
                ],
            ))
        });
        repo.expect_list_companies()
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_contacts()
            .returning(|_| Ok((0, Vec::new())));

        let board = load_board_page(&repo, &admin_user()).expect("board loads");

        assert_eq!(board.columns.len(), Stage::BOARD.len());
        let lead = &board.columns[0];
        assert_eq!(lead.stage, Stage::Lead);
        assert_eq!(lead.opportunities.len(), 2);
        assert_eq!(lead.total_cents, 3_000);
        let proposal = board
            .columns
            .iter()
            .find(|c| c.stage == Stage::Proposal)
            .expect("proposal column");
        assert_eq!(proposal.total_cents, 5_000);
    }

    #[test]
    fn sales_pipeline_summary_is_scoped_to_owner() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_pipeline_summary()
            .withf(|owner_id: &Option<i32>| *owner_id == Some(5))
            .returning(|_| Ok(vec![(Stage::Lead, 1, 1_000)]));

        let summary = pipeline_summary(&repo, &sales_user()).expect("summary loads");
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].count, 1);
    }

    #[test]
    fn sales_board_is_scoped_to_owner() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_list_opportunities()
            .withf(|query: &OpportunityListQuery| query.owner_id == Some(5))
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_companies()
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| query.owner_id == Some(5))
            .returning(|_| Ok((0, Vec::new())));

        load_board_page(&repo, &sales_user()).expect("board loads");
    }

    #[test]
    fn move_logs_old_and_new_stage() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        repo.expect_get_opportunity_by_id()
            .returning(|id| Ok(Some(opportunity(id, 1, Stage::Lead, 100))));
        repo.expect_move_opportunity()
            .withf(|movement: &StageMove| {
                movement.opportunity_id == 7 && movement.stage == Stage::Qualified
            })
            .returning(|movement| {
                let mut moved = opportunity(movement.opportunity_id, 1, movement.stage, 100);
                moved.position = movement.position;
                Ok(moved)
            });
        repo.expect_log_activity()
            .withf(|entry| {
                entry.action == Action::Moved
                    && entry.details["from"] == serde_json::json!(Stage::Lead)
                    && entry.details["to"] == serde_json::json!(Stage::Qualified)
            })
            .returning(|entry| {
                Ok(crate::domain::activity::ActivityEntry {
                    id: 1,
                    user_id: entry.user_id,
                    entity_type: entry.entity_type.clone(),
                    entity_id: entry.entity_id,
                    action: entry.action.clone(),
                    details: entry.details.clone(),
                    created_at: Utc::now().naive_utc(),
                })
            });

        let form = MoveOpportunityForm {
            id: 7,
            stage: "Qualified".to_string(),
            position: 1,
        };
        let moved = move_opportunity(&repo, &admin_user(), &form).expect("move succeeds");
        assert_eq!(moved.stage, Stage::Qualified);
    }

    #[test]
    fn sales_cannot_move_foreign_card() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_get_opportunity_by_id()
            .returning(|id| Ok(Some(opportunity(id, 9, Stage::Lead, 100))));
        repo.expect_move_opportunity().times(0);

        let form = MoveOpportunityForm {
            id: 7,
            stage: "Won".to_string(),
            position: 0,
        };
        let result = move_opportunity(&repo, &sales_user(), &form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_places_card_and_logs() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        stub_activity(&mut repo);
        repo.expect_create_opportunity().returning(|new| {
            let mut created = opportunity(11, new.owner_id, new.stage, new.amount_cents);
            created.title = new.title.clone();
            Ok(created)
        });

        let form = AddOpportunityForm {
            company_id: None,
            contact_id: None,
            title: "Big deal".to_string(),
            amount: 120.50,
            stage: None,
            expected_close: None,
        };
        let created = add_opportunity(&repo, &admin_user(), form).expect("created");
        assert_eq!(created.amount_cents, 12_050);
        assert_eq!(created.stage, Stage::Lead);
    }
}
