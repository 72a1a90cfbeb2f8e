use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::company::{
    Company as DomainCompany, NewCompany as DomainNewCompany, UpdateCompany as DomainUpdateCompany,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::companies)]
/// Diesel model for [`crate::domain::company::Company`].
pub struct Company {
    pub id: i32,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany<'a> {
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub website: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCompany<'a> {
    pub name: &'a str,
    pub industry: Option<&'a str>,
    pub website: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Company> for DomainCompany {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            industry: company.industry,
            website: company.website,
            phone: company.phone,
            address: company.address,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCompany> for NewCompany<'a> {
    fn from(company: &'a DomainNewCompany) -> Self {
        Self {
            name: company.name.as_str(),
            industry: company.industry.as_deref(),
            website: company.website.as_deref(),
            phone: company.phone.as_deref(),
            address: company.address.as_deref(),
        }
    }
}

impl<'a> UpdateCompany<'a> {
    pub fn from_domain(updates: &'a DomainUpdateCompany, updated_at: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_str(),
            industry: updates.industry.as_deref(),
            website: updates.website.as_deref(),
            phone: updates.phone.as_deref(),
            address: updates.address.as_deref(),
            updated_at,
        }
    }
}
