//! Repository implementation for the key-value settings table.

use chrono::Utc;
use diesel::{prelude::*, upsert::excluded};

use crate::{
    domain::settings::{NewSetting, Setting},
    repository::errors::RepositoryResult,
    repository::{DieselRepository, SettingReader, SettingWriter},
};

impl SettingReader for DieselRepository {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>> {
        use crate::models::settings::Setting as DbSetting;
        use crate::schema::crm_settings;

        let mut conn = self.conn()?;
        let setting = crm_settings::table
            .find(key)
            .first::<DbSetting>(&mut conn)
            .optional()?;

        Ok(setting.map(Into::into))
    }

    fn list_settings(&self) -> RepositoryResult<Vec<Setting>> {
        use crate::models::settings::Setting as DbSetting;
        use crate::schema::crm_settings;

        let mut conn = self.conn()?;
        let settings = crm_settings::table
            .order(crm_settings::key.asc())
            .load::<DbSetting>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(settings)
    }
}

impl SettingWriter for DieselRepository {
    fn upsert_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting> {
        use crate::models::settings::{NewSetting as DbNewSetting, Setting as DbSetting};
        use crate::schema::crm_settings;

        let mut conn = self.conn()?;
        let insertable = DbNewSetting::from_domain(setting, Utc::now().naive_utc());

        let saved = diesel::insert_into(crm_settings::table)
            .values(&insertable)
            .on_conflict(crm_settings::key)
            .do_update()
            .set((
                crm_settings::value.eq(excluded(crm_settings::value)),
                crm_settings::updated_at.eq(excluded(crm_settings::updated_at)),
            ))
            .get_result::<DbSetting>(&mut conn)?;

        Ok(saved.into())
    }
}
