use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::{NewSetting as DomainNewSetting, Setting as DomainSetting};

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::crm_settings)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::crm_settings)]
pub struct NewSetting<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Setting> for DomainSetting {
    fn from(setting: Setting) -> Self {
        Self {
            key: setting.key,
            value: setting.value,
            updated_at: setting.updated_at,
        }
    }
}

impl<'a> NewSetting<'a> {
    pub fn from_domain(setting: &'a DomainNewSetting, updated_at: NaiveDateTime) -> Self {
        Self {
            key: setting.key.as_str(),
            value: setting.value.as_str(),
            updated_at,
        }
    }
}
