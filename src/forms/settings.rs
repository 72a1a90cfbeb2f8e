use serde::Deserialize;

use crate::domain::settings::NewSetting;

#[derive(Deserialize)]
/// Settings form posted as parallel `key`/`value` field lists.
pub struct SettingsForm {
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub value: Vec<String>,
}

impl SettingsForm {
    /// Pairs keys with values, dropping rows whose key is blank.
    pub fn into_settings(self) -> Vec<NewSetting> {
        self.key
            .into_iter()
            .zip(self.value)
            .filter(|(key, _)| !key.trim().is_empty())
            .map(|(key, value)| NewSetting::new(key, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_dropped() {
        let form = SettingsForm {
            key: vec!["currency".to_string(), "  ".to_string()],
            value: vec!["EUR".to_string(), "ignored".to_string()],
        };
        let settings = form.into_settings();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].key, "currency");
        assert_eq!(settings[0].value, "EUR");
    }
}
