use crate::domain::settings::Setting;

/// Data required to render the settings template. Known keys are resolved to
/// their defaults when they have never been saved.
pub struct SettingsPageData {
    pub settings: Vec<Setting>,
}
