use serde_json::Value;

use crate::domain::activity::{Action, EntityType, NewActivityEntry};
use crate::dto::activity::{ActivityPageData, ActivityQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{ActivityListQuery, ActivityReader, ActivityWriter, UserWriter};
use crate::services::{ServiceError, ServiceResult, ensure_access, sees_all_records, users};

/// Appends an activity log entry. A failed append is logged and swallowed
/// so that it never rolls back the operation being recorded.
pub fn record<R>(
    repo: &R,
    user_id: i32,
    entity_type: EntityType,
    entity_id: i32,
    action: Action,
    details: Value,
) where
    R: ActivityWriter + ?Sized,
{
    let entry = NewActivityEntry::new(user_id, entity_type, entity_id, action, details);
    if let Err(err) = repo.log_activity(&entry) {
        log::error!("Failed to record activity: {err}");
    }
}

/// Loads the activity log page. Sales reps only see their own entries.
pub fn load_activity_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ActivityQuery,
    per_page: usize,
) -> ServiceResult<ActivityPageData>
where
    R: ActivityReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ActivityListQuery::new().paginate(page, per_page);
    if !sees_all_records(user) {
        list_query = list_query.user(local_user.id);
    }

    let (total, entries) = repo.list_activity(list_query).map_err(ServiceError::from)?;

    let entries = Paginated::new(entries, page, total.div_ceil(per_page));

    Ok(ActivityPageData { entries })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{sales_user, user_with_roles};
    use serde_json::json;

    fn stub_sync(repo: &mut MockRepository) {
        repo.expect_create_or_update_user().returning(|new_user| {
            Ok(User {
                id: 5,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: chrono::Utc::now().naive_utc(),
            })
        });
    }

    #[test]
    fn record_swallows_repository_errors() {
        let mut repo = MockRepository::new();
        repo.expect_log_activity().returning(|_| {
            Err(crate::repository::errors::RepositoryError::DatabaseError(
                "locked".to_string(),
            ))
        });

        record(
            &repo,
            1,
            EntityType::Contact,
            2,
            Action::Created,
            json!({}),
        );
    }

    #[test]
    fn sales_only_sees_own_entries() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo);
        repo.expect_list_activity()
            .withf(|query: &ActivityListQuery| query.user_id == Some(5))
            .returning(|_| Ok((0, Vec::new())));

        let data = load_activity_page(&repo, &sales_user(), ActivityQuery::default(), 20)
            .expect("page loads");
        assert!(data.entries.items.is_empty());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let repo = MockRepository::new();
        let user = user_with_roles(&["billing"]);
        let result = load_activity_page(&repo, &user, ActivityQuery::default(), 20);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
