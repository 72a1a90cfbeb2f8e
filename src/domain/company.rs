use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::normalize_opt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
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

#[derive(Clone, Debug, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NewCompany {
    #[must_use]
    pub fn new(
        name: String,
        industry: Option<String>,
        website: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            industry: normalize_opt(industry),
            website: normalize_opt(website),
            phone: normalize_opt(phone),
            address: normalize_opt(address),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateCompany {
    #[must_use]
    pub fn new(
        name: String,
        industry: Option<String>,
        website: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            industry: normalize_opt(industry),
            website: normalize_opt(website),
            phone: normalize_opt(phone),
            address: normalize_opt(address),
        }
    }
}
