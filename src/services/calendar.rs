use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::json;
use validator::Validate;

use crate::domain::activity::{Action, EntityType};
use crate::domain::reminder::Reminder;
use crate::dto::calendar::{CalendarDay, CalendarPageData, CalendarQuery};
use crate::forms::calendar::AddReminderForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ActivityWriter, ContactListQuery, ContactReader, ReminderListQuery, ReminderReader,
    ReminderWriter, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, activity, ensure_access, sees_all_records, users,
};

/// Loads the monthly calendar grid for the signed-in user. The grid always
/// starts on a Monday and covers whole weeks, so cells from the adjacent
/// months pad the edges.
pub fn load_calendar_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CalendarQuery,
) -> ServiceResult<CalendarPageData>
where
    R: ReminderReader + ContactReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = match query.month {
        Some(month @ 1..=12) => month,
        _ => today.month(),
    };

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ServiceError::Form("Invalid calendar month".to_string()))?;
    let first_of_next = next_month(first);

    let grid_start = first - Duration::days(first.weekday().num_days_from_monday() as i64);
    let last = first_of_next - Duration::days(1);
    let grid_end = last + Duration::days(6 - last.weekday().num_days_from_monday() as i64);

    let reminders = repo
        .list_reminders(
            ReminderListQuery::new(local_user.id)
                .between(
                    grid_start.and_time(NaiveTime::MIN),
                    (grid_end + Duration::days(1)).and_time(NaiveTime::MIN),
                )
                .include_done(),
        )
        .map_err(ServiceError::from)?;

    let mut by_day: HashMap<NaiveDate, Vec<Reminder>> = HashMap::new();
    for reminder in reminders {
        by_day.entry(reminder.due_at.date()).or_default().push(reminder);
    }

    let mut weeks = Vec::new();
    let mut day = grid_start;
    while day <= grid_end {
        let week = (0..7)
            .map(|_| {
                let cell = CalendarDay {
                    date: day,
                    in_month: day.month() == month && day.year() == year,
                    today: day == today,
                    reminders: by_day.remove(&day).unwrap_or_default(),
                };
                day += Duration::days(1);
                cell
            })
            .collect();
        weeks.push(week);
    }

    let prev = prev_month(first);
    let next = next_month(first);

    let mut contact_query = ContactListQuery::new();
    if !sees_all_records(user) {
        contact_query = contact_query.owner(local_user.id);
    }
    let (_, contacts) = repo
        .list_contacts(contact_query)
        .map_err(ServiceError::from)?;

    Ok(CalendarPageData {
        year,
        month,
        weeks,
        prev: (prev.year(), prev.month()),
        next: (next.year(), next.month()),
        contacts,
    })
}

/// Open reminders of the user due within the given day.
pub fn reminders_due_on<R>(
    repo: &R,
    local_user_id: i32,
    day: NaiveDate,
) -> ServiceResult<Vec<Reminder>>
where
    R: ReminderReader + ?Sized,
{
    repo.list_reminders(ReminderListQuery::new(local_user_id).between(
        day.and_time(NaiveTime::MIN),
        (day + Duration::days(1)).and_time(NaiveTime::MIN),
    ))
    .map_err(ServiceError::from)
}

/// Validates the add-reminder form and schedules a reminder for the
/// signed-in user.
pub fn add_reminder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddReminderForm,
) -> ServiceResult<Reminder>
where
    R: ReminderWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid reminder form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let new_reminder = form
        .into_new_reminder(local_user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let reminder = repo.create_reminder(&new_reminder).map_err(|err| {
        log::error!("Failed to add a reminder: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Reminder,
        reminder.id,
        Action::Created,
        json!({ "title": reminder.title, "due_at": reminder.due_at }),
    );

    Ok(reminder)
}

/// Marks a reminder done or reopens it. Owner only.
pub fn set_reminder_done<R>(
    repo: &R,
    user: &AuthenticatedUser,
    reminder_id: i32,
    done: bool,
) -> ServiceResult<Reminder>
where
    R: ReminderReader + ReminderWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    get_own_reminder(repo, local_user.id, reminder_id)?;

    repo.set_reminder_done(reminder_id, done).map_err(|err| {
        log::error!("Failed to update reminder: {err}");
        ServiceError::from(err)
    })
}

/// Removes a reminder. Owner only.
pub fn delete_reminder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    reminder_id: i32,
) -> ServiceResult<()>
where
    R: ReminderReader + ReminderWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    get_own_reminder(repo, local_user.id, reminder_id)?;

    repo.delete_reminder(reminder_id).map_err(|err| {
        log::error!("Failed to delete reminder: {err}");
        ServiceError::from(err)
    })
}

/// Reminders visible through the JSON feed within an arbitrary window.
pub fn reminders_between<R>(
    repo: &R,
    local_user_id: i32,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> ServiceResult<Vec<Reminder>>
where
    R: ReminderReader + ?Sized,
{
    repo.list_reminders(
        ReminderListQuery::new(local_user_id)
            .between(from, until)
            .include_done(),
    )
    .map_err(ServiceError::from)
}

fn get_own_reminder<R>(repo: &R, local_user_id: i32, reminder_id: i32) -> ServiceResult<Reminder>
where
    R: ReminderReader + ?Sized,
{
    let reminder = repo
        .get_reminder_by_id(reminder_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if reminder.user_id != local_user_id {
        return Err(ServiceError::Unauthorized);
    }

    Ok(reminder)
}

fn next_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    // Both arms construct the first of a valid month.
    .unwrap_or(first)
}

fn prev_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 1 {
        NaiveDate::from_ymd_opt(first.year() - 1, 12, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() - 1, 1)
    }
    .unwrap_or(first)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::sales_user;

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

    fn reminder_at(user_id: i32, due_at: NaiveDateTime) -> Reminder {
        Reminder {
            id: 1,
            user_id,
            title: "Call".to_string(),
            due_at,
            ..Reminder::default()
        }
    }

    #[test]
    fn grid_covers_whole_weeks() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_list_reminders().returning(|_| Ok(Vec::new()));
        repo.expect_list_contacts()
            .returning(|_| Ok((0, Vec::new())));

        let query = CalendarQuery {
            year: Some(2026),
            month: Some(9),
        };
        let page = load_calendar_page(&repo, &sales_user(), query).expect("page loads");

        // September 2026 starts on a Tuesday and ends on a Wednesday.
        assert_eq!(page.weeks.len(), 5);
        let first_cell = &page.weeks[0][0];
        assert_eq!(first_cell.date, NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
        assert!(!first_cell.in_month);
        assert_eq!(page.prev, (2026, 8));
        assert_eq!(page.next, (2026, 10));
    }

    #[test]
    fn reminders_land_on_their_day() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        let due = NaiveDate::from_ymd_opt(2026, 9, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        repo.expect_list_reminders()
            .returning(move |_| Ok(vec![reminder_at(5, due)]));
        repo.expect_list_contacts()
            .returning(|_| Ok((0, Vec::new())));

        let query = CalendarQuery {
            year: Some(2026),
            month: Some(9),
        };
        let page = load_calendar_page(&repo, &sales_user(), query).expect("page loads");

        let cell = page
            .weeks
            .iter()
            .flatten()
            .find(|cell| cell.date == due.date())
            .expect("day cell exists");
        assert_eq!(cell.reminders.len(), 1);
    }

    #[test]
    fn foreign_reminder_cannot_be_completed() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_get_reminder_by_id()
            .returning(|_| Ok(Some(reminder_at(9, Utc::now().naive_utc()))));
        repo.expect_set_reminder_done().times(0);

        let result = set_reminder_done(&repo, &sales_user(), 1, true);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn december_rolls_over_to_january() {
        let first = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(next_month(first), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        let january = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(prev_month(january), NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }
}
