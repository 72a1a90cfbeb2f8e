use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::json;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::activity::{Action, EntityType};
use crate::domain::settings::{
    default_for, NewSetting, SETTING_COMPANY_NAME, SETTING_CURRENCY, SETTING_ITEMS_PER_PAGE,
    Setting,
};
use crate::dto::settings::SettingsPageData;
use crate::forms::settings::SettingsForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ActivityWriter, SettingReader, SettingWriter, UserWriter};
use crate::services::{ServiceError, ServiceResult, activity, ensure_access, ensure_role, users};

/// Read-through cache over the settings table. Reads hit the table only on
/// a cache miss; saves write through and refresh the cached value.
#[derive(Default)]
pub struct SettingsCache {
    values: RwLock<HashMap<String, String>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a setting value, falling back to the built-in default for
    /// known keys.
    pub fn get<R>(&self, repo: &R, key: &str) -> ServiceResult<Option<String>>
    where
        R: SettingReader + ?Sized,
    {
        if let Ok(values) = self.values.read()
            && let Some(value) = values.get(key)
        {
            return Ok(Some(value.clone()));
        }

        let stored = repo
            .get_setting(key)
            .map_err(ServiceError::from)?
            .map(|setting| setting.value);

        if let Some(value) = &stored
            && let Ok(mut values) = self.values.write()
        {
            values.insert(key.to_string(), value.clone());
        }

        Ok(stored.or_else(|| default_for(key).map(str::to_string)))
    }

    /// The configured page size, falling back when the stored value is not
    /// a usable number.
    pub fn items_per_page<R>(&self, repo: &R) -> usize
    where
        R: SettingReader + ?Sized,
    {
        match self.get(repo, SETTING_ITEMS_PER_PAGE) {
            Ok(Some(value)) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => DEFAULT_ITEMS_PER_PAGE,
            },
            Ok(None) => DEFAULT_ITEMS_PER_PAGE,
            Err(err) => {
                log::error!("Failed to read items_per_page: {err}");
                DEFAULT_ITEMS_PER_PAGE
            }
        }
    }

    fn store(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

/// Loads the settings page for the admin interface. Known keys that have
/// never been saved appear with their defaults.
pub fn load_settings_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<SettingsPageData>
where
    R: SettingReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let mut settings = repo.list_settings().map_err(ServiceError::from)?;

    for key in [SETTING_COMPANY_NAME, SETTING_CURRENCY, SETTING_ITEMS_PER_PAGE] {
        if !settings.iter().any(|setting| setting.key == key) {
            settings.push(Setting {
                key: key.to_string(),
                value: default_for(key).unwrap_or_default().to_string(),
                updated_at: Utc::now().naive_utc(),
            });
        }
    }
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(SettingsPageData { settings })
}

/// Persists the posted settings and refreshes the cache. Admin only.
pub fn save_settings<R>(
    repo: &R,
    cache: &SettingsCache,
    user: &AuthenticatedUser,
    form: SettingsForm,
) -> ServiceResult<()>
where
    R: SettingWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let local_user = users::sync_user(repo, user)?;
    let settings = form.into_settings();

    for new_setting in &settings {
        let saved = repo.upsert_setting(new_setting).map_err(|err| {
            log::error!("Failed to save setting: {err}");
            ServiceError::from(err)
        })?;
        cache.store(&saved.key, &saved.value);
    }

    activity::record(
        repo,
        local_user.id,
        EntityType::Setting,
        0,
        Action::Updated,
        json!({ "keys": settings.iter().map(|s| s.key.as_str()).collect::<Vec<_>>() }),
    );

    Ok(())
}

/// Resolves the display settings used by every template.
pub fn branding<R>(
    repo: &R,
    cache: &SettingsCache,
    user: &AuthenticatedUser,
) -> ServiceResult<(String, String)>
where
    R: SettingReader + ?Sized,
{
    ensure_access(user)?;

    let company_name = cache
        .get(repo, SETTING_COMPANY_NAME)?
        .unwrap_or_else(|| "FlowCRM".to_string());
    let currency = cache
        .get(repo, SETTING_CURRENCY)?
        .unwrap_or_else(|| "USD".to_string());

    Ok((company_name, currency))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, sales_user};

    #[test]
    fn get_reads_the_table_once() {
        let mut repo = MockRepository::new();
        repo.expect_get_setting().times(1).returning(|key| {
            Ok(Some(Setting {
                key: key.to_string(),
                value: "EUR".to_string(),
                updated_at: Utc::now().naive_utc(),
            }))
        });

        let cache = SettingsCache::new();
        assert_eq!(
            cache.get(&repo, SETTING_CURRENCY).expect("first read"),
            Some("EUR".to_string())
        );
        // Second read must be served from the cache.
        assert_eq!(
            cache.get(&repo, SETTING_CURRENCY).expect("second read"),
            Some("EUR".to_string())
        );
    }

    #[test]
    fn missing_known_key_falls_back_to_default() {
        let mut repo = MockRepository::new();
        repo.expect_get_setting().returning(|_| Ok(None));

        let cache = SettingsCache::new();
        assert_eq!(
            cache.get(&repo, SETTING_CURRENCY).expect("read"),
            Some("USD".to_string())
        );
    }

    #[test]
    fn bad_items_per_page_falls_back() {
        let mut repo = MockRepository::new();
        repo.expect_get_setting().returning(|key| {
            Ok(Some(Setting {
                key: key.to_string(),
                value: "zero".to_string(),
                updated_at: Utc::now().naive_utc(),
            }))
        });

        let cache = SettingsCache::new();
        assert_eq!(cache.items_per_page(&repo), DEFAULT_ITEMS_PER_PAGE);
    }

    #[test]
    fn save_refreshes_the_cache() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user().returning(|new_user| {
            Ok(crate::domain::user::User {
                id: 1,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_upsert_setting().returning(|new_setting| {
            Ok(Setting {
                key: new_setting.key.clone(),
                value: new_setting.value.clone(),
                updated_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_log_activity().returning(|entry| {
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
        // The refreshed cache never touches the reader.
        repo.expect_get_setting().times(0);

        let cache = SettingsCache::new();
        let form = SettingsForm {
            key: vec![SETTING_CURRENCY.to_string()],
            value: vec!["GBP".to_string()],
        };
        save_settings(&repo, &cache, &admin_user(), form).expect("save succeeds");

        assert_eq!(
            cache.get(&repo, SETTING_CURRENCY).expect("cached read"),
            Some("GBP".to_string())
        );
    }

    #[test]
    fn settings_page_is_admin_only() {
        let repo = MockRepository::new();
        let result = load_settings_page(&repo, &sales_user());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
