use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: i32,
    pub user_id: i32,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub action: Action,
    pub details: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum EntityType {
    Contact,
    Company,
    Document,
    Opportunity,
    Reminder,
    ImportJob,
    Setting,
    Other(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Action {
    Created,
    Updated,
    Deleted,
    Moved,
    Imported,
    Other(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewActivityEntry {
    pub user_id: i32,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub action: Action,
    pub details: Value,
}

impl NewActivityEntry {
    #[must_use]
    pub fn new(
        user_id: i32,
        entity_type: EntityType,
        entity_id: i32,
        action: Action,
        details: Value,
    ) -> Self {
        Self {
            user_id,
            entity_type,
            entity_id,
            action,
            details,
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Contact => write!(f, "Contact"),
            EntityType::Company => write!(f, "Company"),
            EntityType::Document => write!(f, "Document"),
            EntityType::Opportunity => write!(f, "Opportunity"),
            EntityType::Reminder => write!(f, "Reminder"),
            EntityType::ImportJob => write!(f, "ImportJob"),
            EntityType::Setting => write!(f, "Setting"),
            EntityType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        match s {
            "Contact" => EntityType::Contact,
            "Company" => EntityType::Company,
            "Document" => EntityType::Document,
            "Opportunity" => EntityType::Opportunity,
            "Reminder" => EntityType::Reminder,
            "ImportJob" => EntityType::ImportJob,
            "Setting" => EntityType::Setting,
            _ => EntityType::Other(s.to_string()),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Created => write!(f, "Created"),
            Action::Updated => write!(f, "Updated"),
            Action::Deleted => write!(f, "Deleted"),
            Action::Moved => write!(f, "Moved"),
            Action::Imported => write!(f, "Imported"),
            Action::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "Created" => Action::Created,
            "Updated" => Action::Updated,
            "Deleted" => Action::Deleted,
            "Moved" => Action::Moved,
            "Imported" => Action::Imported,
            _ => Action::Other(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips() {
        for s in ["Contact", "Company", "Opportunity", "Custom"] {
            assert_eq!(EntityType::from(s).to_string(), s);
        }
    }

    #[test]
    fn action_round_trips() {
        for s in ["Created", "Updated", "Deleted", "Moved", "Imported", "X"] {
            assert_eq!(Action::from(s).to_string(), s);
        }
    }
}
