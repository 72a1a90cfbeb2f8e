use chrono::Utc;

use crate::dto::main::DashboardPageData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ActivityListQuery, ActivityReader, CompanyListQuery, CompanyReader, ContactListQuery,
    ContactReader, OpportunityReader, ReminderReader, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, calendar, ensure_access, opportunities, sees_all_records, users,
};

/// How many recent activity entries the dashboard shows.
const DASHBOARD_ACTIVITY_LIMIT: usize = 10;

/// Loads the dashboard: record counts, the pipeline rollup, reminders due
/// today, and the tail of the activity log.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardPageData>
where
    R: ContactReader
        + CompanyReader
        + OpportunityReader
        + ReminderReader
        + ActivityReader
        + UserWriter
        + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let mut contact_query = ContactListQuery::new();
    if !sees_all_records(user) {
        contact_query = contact_query.owner(local_user.id);
    }
    let (contact_total, _) = repo
        .list_contacts(contact_query.paginate(1, 1))
        .map_err(ServiceError::from)?;

    let (company_total, _) = repo
        .list_companies(CompanyListQuery::new().paginate(1, 1))
        .map_err(ServiceError::from)?;

    let pipeline = opportunities::pipeline_summary(repo, user)?;

    let due_today = calendar::reminders_due_on(repo, local_user.id, Utc::now().date_naive())?;

    let mut activity_query = ActivityListQuery::new().paginate(1, DASHBOARD_ACTIVITY_LIMIT);
    if !sees_all_records(user) {
        activity_query = activity_query.user(local_user.id);
    }
    let (_, recent_activity) = repo
        .list_activity(activity_query)
        .map_err(ServiceError::from)?;

    Ok(DashboardPageData {
        contact_total,
        company_total,
        pipeline,
        due_today,
        recent_activity,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::opportunity::Stage;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, user_with_roles};

    #[test]
    fn dashboard_collects_counts_and_rollups() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user().returning(|new_user| {
            Ok(User {
                id: 1,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_list_contacts().returning(|_| Ok((7, Vec::new())));
        repo.expect_list_companies()
            .returning(|_| Ok((3, Vec::new())));
        repo.expect_pipeline_summary()
            .withf(|owner_id: &Option<i32>| owner_id.is_none())
            .returning(|_| Ok(vec![(Stage::Lead, 2, 5_000)]));
        repo.expect_list_reminders().returning(|_| Ok(Vec::new()));
        repo.expect_list_activity().returning(|_| Ok((0, Vec::new())));

        let data = load_dashboard(&repo, &admin_user()).expect("dashboard loads");
        assert_eq!(data.contact_total, 7);
        assert_eq!(data.company_total, 3);
        assert_eq!(data.pipeline.len(), 1);
        assert_eq!(data.pipeline[0].stage, Stage::Lead);
    }

    #[test]
    fn dashboard_requires_a_crm_role() {
        let repo = MockRepository::new();
        let result = load_dashboard(&repo, &user_with_roles(&["auditor"]));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
