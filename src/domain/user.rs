use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::auth::AuthenticatedUser;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl NewUser {
    #[must_use]
    pub fn new(name: String, email: String, role: String) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
        }
    }
}

impl From<&AuthenticatedUser> for NewUser {
    fn from(user: &AuthenticatedUser) -> Self {
        // The token carries the full role list; the persisted row keeps the
        // strongest one for display purposes.
        let role = ["admin", "manager", "sales"]
            .into_iter()
            .find(|role| user.roles.iter().any(|r| r == role))
            .unwrap_or("sales")
            .to_string();

        NewUser::new(user.name.clone(), user.email.clone(), role)
    }
}
