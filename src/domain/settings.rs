use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Well-known setting keys with their defaults. Unknown keys are stored and
/// served verbatim.
pub const SETTING_COMPANY_NAME: &str = "company_name";
pub const SETTING_CURRENCY: &str = "currency";
pub const SETTING_ITEMS_PER_PAGE: &str = "items_per_page";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
}

impl NewSetting {
    #[must_use]
    pub fn new(key: String, value: String) -> Self {
        Self {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        }
    }
}

/// Default value served when a known key is absent from the table.
pub fn default_for(key: &str) -> Option<&'static str> {
    match key {
        SETTING_COMPANY_NAME => Some("FlowCRM"),
        SETTING_CURRENCY => Some("USD"),
        SETTING_ITEMS_PER_PAGE => Some("20"),
        _ => None,
    }
}
