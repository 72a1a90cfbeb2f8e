use serde_json::json;
use validator::Validate;

use crate::domain::activity::{Action, EntityType};
use crate::domain::contact::{Contact, UpdateContact};
use crate::dto::contacts::{ContactPageData, ContactsPageData, ContactsQuery};
use crate::forms::contacts::{AddContactForm, SaveContactForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, CompanyListQuery, CompanyReader,
    ContactListQuery, ContactReader, ContactWriter, DocumentReader, ReminderListQuery,
    ReminderReader, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, activity, ensure_access, ensure_role, sees_all_records, users,
};
use crate::SERVICE_ADMIN_ROLE;

/// How many recent activity entries a contact card shows.
const CONTACT_ACTIVITY_LIMIT: usize = 10;

/// Loads the contacts list. Sales reps only see contacts they own.
pub fn load_contacts_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ContactsQuery,
    per_page: usize,
) -> ServiceResult<ContactsPageData>
where
    R: ContactReader + CompanyReader + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ContactListQuery::new().paginate(page, per_page);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }
    if !sees_all_records(user) {
        list_query = list_query.owner(local_user.id);
    }

    let (total, contacts) = repo.list_contacts(list_query).map_err(ServiceError::from)?;

    let (_, companies) = repo
        .list_companies(CompanyListQuery::new())
        .map_err(ServiceError::from)?;

    let contacts = Paginated::new(contacts, page, total.div_ceil(per_page));

    Ok(ContactsPageData {
        contacts,
        companies,
        search_query,
    })
}

/// Loads one contact card with its company, documents, reminders, and the
/// tail of its activity log.
pub fn load_contact_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<ContactPageData>
where
    R: ContactReader
        + CompanyReader
        + DocumentReader
        + ReminderReader
        + ActivityReader
        + UserWriter
        + ?Sized,
{
    ensure_access(user)?;

    let local_user = users::sync_user(repo, user)?;
    let contact = get_visible_contact(repo, user, local_user.id, contact_id)?;

    let company = match contact.company_id {
        Some(company_id) => repo
            .get_company_by_id(company_id)
            .map_err(ServiceError::from)?,
        None => None,
    };

    let (_, companies) = repo
        .list_companies(CompanyListQuery::new())
        .map_err(ServiceError::from)?;

    let documents = repo
        .list_contact_documents(contact_id)
        .map_err(ServiceError::from)?;

    let reminders = repo
        .list_reminders(ReminderListQuery::new(local_user.id).contact(contact_id))
        .map_err(ServiceError::from)?;

    let (_, entries) = repo
        .list_activity(
            ActivityListQuery::new()
                .entity(EntityType::Contact, contact_id)
                .paginate(1, CONTACT_ACTIVITY_LIMIT),
        )
        .map_err(ServiceError::from)?;

    Ok(ContactPageData {
        contact,
        company,
        companies,
        documents,
        reminders,
        activity: entries,
    })
}

/// Validates the add-contact form and persists a new contact owned by the
/// signed-in user.
pub fn add_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddContactForm,
) -> ServiceResult<Contact>
where
    R: ContactWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid contact form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let new_contact = form.into_new_contact(local_user.id);

    let contact = repo.create_contact(&new_contact).map_err(|err| {
        log::error!("Failed to add a contact: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Contact,
        contact.id,
        Action::Created,
        json!({ "name": contact.name }),
    );

    Ok(contact)
}

/// Validates the save-contact form and applies the update.
pub fn save_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveContactForm,
) -> ServiceResult<Contact>
where
    R: ContactReader + ContactWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid contact form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let contact_id = form.id;
    get_visible_contact(repo, user, local_user.id, contact_id)?;

    let updates: UpdateContact = form.into();
    let contact = repo.update_contact(contact_id, &updates).map_err(|err| {
        log::error!("Failed to update contact: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Contact,
        contact.id,
        Action::Updated,
        json!({ "name": contact.name }),
    );

    Ok(contact)
}

/// Removes a contact along with its documents and reminders. Admin only.
pub fn delete_contact<R>(repo: &R, user: &AuthenticatedUser, contact_id: i32) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let contact = repo
        .get_contact_by_id(contact_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let local_user = users::sync_user(repo, user)?;

    repo.delete_contact(contact_id).map_err(|err| {
        log::error!("Failed to delete contact: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Contact,
        contact_id,
        Action::Deleted,
        json!({ "name": contact.name }),
    );

    Ok(())
}

/// Fetches a contact, enforcing the ownership rule for sales reps.
fn get_visible_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    local_user_id: i32,
    contact_id: i32,
) -> ServiceResult<Contact>
where
    R: ContactReader + ?Sized,
{
    let contact = repo
        .get_contact_by_id(contact_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !sees_all_records(user) && contact.owner_id != local_user_id {
        return Err(ServiceError::Unauthorized);
    }

    Ok(contact)
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

    fn contact_owned_by(owner_id: i32) -> Contact {
        Contact {
            id: 10,
            owner_id,
            name: "Jane Doe".to_string(),
            ..Contact::default()
        }
    }

    #[test]
    fn sales_list_is_scoped_to_owner() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| query.owner_id == Some(5))
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_companies()
            .returning(|_| Ok((0, Vec::new())));

        let data = load_contacts_page(&repo, &sales_user(), ContactsQuery::default(), 20)
            .expect("page loads");
        assert!(data.contacts.items.is_empty());
    }

    #[test]
    fn admin_list_is_unscoped() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| query.owner_id.is_none())
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_companies()
            .returning(|_| Ok((0, Vec::new())));

        load_contacts_page(&repo, &admin_user(), ContactsQuery::default(), 20)
            .expect("page loads");
    }

    #[test]
    fn sales_cannot_open_foreign_contact() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_get_contact_by_id()
            .returning(|_| Ok(Some(contact_owned_by(7))));

        let result = load_contact_page(&repo, &sales_user(), 10);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn delete_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_delete_contact().times(0);

        let result = delete_contact(&repo, &sales_user(), 10);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_contact_logs_activity() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        repo.expect_create_contact().returning(|new_contact| {
            let mut contact = contact_owned_by(new_contact.owner_id);
            contact.name = new_contact.name.clone();
            Ok(contact)
        });
        repo.expect_log_activity()
            .withf(|entry| {
                entry.entity_type == EntityType::Contact && entry.action == Action::Created
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

        let form = AddContactForm {
            company_id: None,
            name: "Jane Doe".to_string(),
            email: None,
            phone: None,
            position: None,
            address: None,
        };
        let contact = add_contact(&repo, &admin_user(), form).expect("contact created");
        assert_eq!(contact.name, "Jane Doe");
    }
}
