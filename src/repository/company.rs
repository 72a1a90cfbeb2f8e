//! Repository implementation for CRM companies.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::company::{Company, NewCompany, UpdateCompany},
    repository::{CompanyListQuery, CompanyReader, CompanyWriter, DieselRepository},
    repository::errors::RepositoryResult,
};

impl CompanyReader for DieselRepository {
    fn get_company_by_id(&self, id: i32) -> RepositoryResult<Option<Company>> {
        use crate::models::company::Company as DbCompany;
        use crate::schema::companies;

        let mut conn = self.conn()?;
        let company = companies::table
            .find(id)
            .first::<DbCompany>(&mut conn)
            .optional()?;

        Ok(company.map(Into::into))
    }

    fn get_company_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        use crate::models::company::Company as DbCompany;
        use crate::schema::companies;

        let mut conn = self.conn()?;
        let company = companies::table
            .filter(companies::name.eq(name))
            .first::<DbCompany>(&mut conn)
            .optional()?;

        Ok(company.map(Into::into))
    }

    fn list_companies(&self, query: CompanyListQuery) -> RepositoryResult<(usize, Vec<Company>)> {
        use crate::models::company::Company as DbCompany;
        use crate::schema::companies;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = companies::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    companies::name
                        .like(pattern.clone())
                        .or(companies::industry.like(pattern.clone()))
                        .or(companies::address.like(pattern)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(companies::name.asc());
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let companies = items
            .load::<DbCompany>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, companies))
    }
}

impl CompanyWriter for DieselRepository {
    fn create_company(&self, new_company: &NewCompany) -> RepositoryResult<Company> {
        use crate::models::company::{Company as DbCompany, NewCompany as DbNewCompany};
        use crate::schema::companies;

        let mut conn = self.conn()?;
        let insertable: DbNewCompany = new_company.into();

        let created = diesel::insert_into(companies::table)
            .values(&insertable)
            .get_result::<DbCompany>(&mut conn)?;

        Ok(created.into())
    }

    fn update_company(
        &self,
        company_id: i32,
        updates: &UpdateCompany,
    ) -> RepositoryResult<Company> {
        use crate::models::company::{Company as DbCompany, UpdateCompany as DbUpdateCompany};
        use crate::schema::companies;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateCompany::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(companies::table.find(company_id))
            .set(&db_updates)
            .get_result::<DbCompany>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_company(&self, company_id: i32) -> RepositoryResult<()> {
        use crate::schema::{companies, contacts, documents, opportunities};

        let mut conn = self.conn()?;

        // Contacts and opportunities survive, detached from the company.
        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::update(contacts::table.filter(contacts::company_id.eq(company_id)))
                .set(contacts::company_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::update(opportunities::table.filter(opportunities::company_id.eq(company_id)))
                .set(opportunities::company_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(documents::table.filter(documents::company_id.eq(company_id)))
                .execute(conn)?;
            diesel::delete(companies::table.find(company_id)).execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }
}
