use serde::Deserialize;
use validator::Validate;

use crate::domain::company::{NewCompany, UpdateCompany};

#[derive(Deserialize, Validate)]
/// Form data for creating a company.
pub struct AddCompanyForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub industry: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<AddCompanyForm> for NewCompany {
    fn from(form: AddCompanyForm) -> Self {
        NewCompany::new(
            form.name,
            form.industry,
            form.website,
            form.phone,
            form.address,
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing company.
pub struct SaveCompanyForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    pub industry: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<SaveCompanyForm> for UpdateCompany {
    fn from(form: SaveCompanyForm) -> Self {
        UpdateCompany::new(
            form.name,
            form.industry,
            form.website,
            form.phone,
            form.address,
        )
    }
}
