use chrono::{Duration, NaiveTime, Utc};

use crate::dto::api::{
    ActivityResponse, CalendarFeedQuery, CalendarFeedResponse, CompaniesQuery, CompaniesResponse,
    ContactsQuery, ContactsResponse, OpportunitiesQuery, OpportunitiesResponse,
};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    ActivityListQuery, ActivityReader, CompanyListQuery, CompanyReader, ContactListQuery,
    ContactReader, OpportunityListQuery, OpportunityReader, ReminderReader, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, calendar, ensure_access, sees_all_records, users,
};

/// Days covered by the calendar feed when the caller gives no window.
const DEFAULT_FEED_DAYS: i64 = 31;

/// Returns the filtered list of contacts visible to the authenticated user.
pub fn list_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ContactsQuery,
) -> ServiceResult<ContactsResponse>
where
    R: ContactReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let mut query = ContactListQuery::new();
    if !sees_all_records(user) {
        query = query.owner(local_user.id);
    }
    if let Some(page) = params.page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = search {
        query = query.search(term);
    }

    let (total, contacts) = repo.list_contacts(query).map_err(ServiceError::from)?;

    Ok(ContactsResponse { total, contacts })
}

/// Returns the filtered list of companies.
pub fn list_companies<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: CompaniesQuery,
) -> ServiceResult<CompaniesResponse>
where
    R: CompanyReader + ?Sized,
{
    ensure_access(user)?;

    let mut query = CompanyListQuery::new();
    if let Some(page) = params.page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = search {
        query = query.search(term);
    }

    let (total, companies) = repo.list_companies(query).map_err(ServiceError::from)?;

    Ok(CompaniesResponse { total, companies })
}

/// Returns the opportunities visible to the authenticated user, optionally
/// narrowed to one stage.
pub fn list_opportunities<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: OpportunitiesQuery,
) -> ServiceResult<OpportunitiesResponse>
where
    R: OpportunityReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let mut query = OpportunityListQuery::new().include_terminal();
    if !sees_all_records(user) {
        query = query.owner(local_user.id);
    }
    if let Some(stage) = params.stage {
        query = query.stage(stage);
    }
    if let Some(page) = params.page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    let (total, opportunities) = repo.list_opportunities(query).map_err(ServiceError::from)?;

    Ok(OpportunitiesResponse {
        total,
        opportunities,
    })
}

/// JSON feed of the user's reminders, for external calendar clients.
pub fn calendar_feed<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: CalendarFeedQuery,
) -> ServiceResult<CalendarFeedResponse>
where
    R: ReminderReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let from = params.from.unwrap_or_else(|| Utc::now().date_naive());
    let until = params.until.unwrap_or(from + Duration::days(DEFAULT_FEED_DAYS));
    if until < from {
        return Err(ServiceError::Form("Feed window is inverted".to_string()));
    }

    let reminders = calendar::reminders_between(
        repo,
        local_user.id,
        from.and_time(NaiveTime::MIN),
        (until + Duration::days(1)).and_time(NaiveTime::MIN),
    )?;

    Ok(CalendarFeedResponse { reminders })
}

/// Page of activity log entries visible to the authenticated user.
pub fn list_activity<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: Option<usize>,
) -> ServiceResult<ActivityResponse>
where
    R: ActivityReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let mut query = ActivityListQuery::new().paginate(page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
    if !sees_all_records(user) {
        query = query.user(local_user.id);
    }

    let (total, entries) = repo.list_activity(query).map_err(ServiceError::from)?;

    Ok(ActivityResponse { total, entries })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{sales_user, user_with_roles};
    use chrono::NaiveDate;

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

    #[test]
    fn contacts_feed_is_scoped_for_sales() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| query.owner_id == Some(5))
            .returning(|_| Ok((0, Vec::new())));

        list_contacts(&repo, &sales_user(), ContactsQuery::default()).expect("feed loads");
    }

    #[test]
    fn inverted_feed_window_is_rejected() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);

        let params = CalendarFeedQuery {
            from: NaiveDate::from_ymd_opt(2026, 9, 10),
            until: NaiveDate::from_ymd_opt(2026, 9, 1),
        };
        let result = calendar_feed(&repo, &sales_user(), params);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn api_requires_a_crm_role() {
        let repo = MockRepository::new();
        let result = list_companies(&repo, &user_with_roles(&["guest"]), CompaniesQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
