use serde_json::json;
use validator::Validate;

use crate::domain::activity::{Action, EntityType};
use crate::domain::company::{Company, NewCompany, UpdateCompany};
use crate::dto::companies::{CompaniesPageData, CompaniesQuery, CompanyPageData};
use crate::forms::companies::{AddCompanyForm, SaveCompanyForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::Paginated;
use crate::repository::{
    ActivityWriter, CompanyListQuery, CompanyReader, CompanyWriter, ContactListQuery,
    ContactReader, DocumentReader, OpportunityListQuery, OpportunityReader, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, activity, ensure_access, ensure_role, sees_all_records, users,
};
use crate::SERVICE_ADMIN_ROLE;

/// Loads the companies list. Companies are shared records visible to every
/// CRM role.
pub fn load_companies_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CompaniesQuery,
    per_page: usize,
) -> ServiceResult<CompaniesPageData>
where
    R: CompanyReader + ?Sized,
{
    ensure_access(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = CompanyListQuery::new().paginate(page, per_page);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, companies) = repo.list_companies(list_query).map_err(ServiceError::from)?;

    let companies = Paginated::new(companies, page, total.div_ceil(per_page));

    Ok(CompaniesPageData {
        companies,
        search_query,
    })
}

/// Loads one company card with its contacts, opportunities, and documents.
/// The company itself is shared, but the attached contacts and deals follow
/// the usual visibility rule: sales reps only see their own.
pub fn load_company_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    company_id: i32,
) -> ServiceResult<CompanyPageData>
where
    R: CompanyReader
        + ContactReader
        + OpportunityReader
        + DocumentReader
        + UserWriter
        + ?Sized,
{
    ensure_access(user)?;

    let company = repo
        .get_company_by_id(company_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let local_user = users::sync_user(repo, user)?;

    let mut contact_query = ContactListQuery::new().company(company_id);
    let mut opportunity_query = OpportunityListQuery::new()
        .company(company_id)
        .include_terminal();
    if !sees_all_records(user) {
        contact_query = contact_query.owner(local_user.id);
        opportunity_query = opportunity_query.owner(local_user.id);
    }

    let (_, contacts) = repo
        .list_contacts(contact_query)
        .map_err(ServiceError::from)?;

    let (_, opportunities) = repo
        .list_opportunities(opportunity_query)
        .map_err(ServiceError::from)?;

    let documents = repo
        .list_company_documents(company_id)
        .map_err(ServiceError::from)?;

    Ok(CompanyPageData {
        company,
        contacts,
        opportunities,
        documents,
    })
}

/// Validates the add-company form and persists a new company.
pub fn add_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid company form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let new_company: NewCompany = form.into();

    let company = repo.create_company(&new_company).map_err(|err| {
        log::error!("Failed to add a company: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Company,
        company.id,
        Action::Created,
        json!({ "name": company.name }),
    );

    Ok(company)
}

/// Validates the save-company form and applies the update.
pub fn save_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveCompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid company form".to_string()));
    }

    let local_user = users::sync_user(repo, user)?;
    let company_id = form.id;
    let updates: UpdateCompany = form.into();

    let company = repo.update_company(company_id, &updates).map_err(|err| {
        log::error!("Failed to update company: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Company,
        company.id,
        Action::Updated,
        json!({ "name": company.name }),
    );

    Ok(company)
}

/// Removes a company. Contacts and opportunities are detached, not deleted.
/// Admin only.
pub fn delete_company<R>(repo: &R, user: &AuthenticatedUser, company_id: i32) -> ServiceResult<()>
where
    R: CompanyReader + CompanyWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let company = repo
        .get_company_by_id(company_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let local_user = users::sync_user(repo, user)?;

    repo.delete_company(company_id).map_err(|err| {
        log::error!("Failed to delete company: {err}");
        ServiceError::from(err)
    })?;

    activity::record(
        repo,
        local_user.id,
        EntityType::Company,
        company_id,
        Action::Deleted,
        json!({ "name": company.name }),
    );

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, sales_user, user_with_roles};
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

    fn stub_company(repo: &mut MockRepository, id: i32) {
        repo.expect_get_company_by_id().returning(move |_| {
            Ok(Some(Company {
                id,
                name: "Acme".to_string(),
                ..Company::default()
            }))
        });
    }

    #[test]
    fn companies_are_visible_to_sales() {
        let mut repo = MockRepository::new();
        repo.expect_list_companies()
            .returning(|_| Ok((0, Vec::new())));

        load_companies_page(&repo, &sales_user(), CompaniesQuery::default(), 20)
            .expect("page loads");
    }

    #[test]
    fn sales_company_page_only_lists_own_records() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        stub_company(&mut repo, 3);
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| {
                query.owner_id == Some(5) && query.company_id == Some(3)
            })
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_opportunities()
            .withf(|query: &OpportunityListQuery| {
                query.owner_id == Some(5) && query.company_id == Some(3)
            })
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_company_documents()
            .returning(|_| Ok(Vec::new()));

        load_company_page(&repo, &sales_user(), 3).expect("page loads");
    }

    #[test]
    fn admin_company_page_lists_every_record() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 1);
        stub_company(&mut repo, 3);
        repo.expect_list_contacts()
            .withf(|query: &ContactListQuery| query.owner_id.is_none())
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_opportunities()
            .withf(|query: &OpportunityListQuery| query.owner_id.is_none())
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_company_documents()
            .returning(|_| Ok(Vec::new()));

        load_company_page(&repo, &admin_user(), 3).expect("page loads");
    }

    #[test]
    fn missing_company_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_company_by_id().returning(|_| Ok(None));

        let result = load_company_page(&repo, &sales_user(), 42);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn delete_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_delete_company().times(0);

        let result = delete_company(&repo, &user_with_roles(&["manager"]), 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
