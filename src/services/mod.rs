//! Service layer: authorization checks, activity logging, and orchestration
//! between the repository traits and the route handlers.

use crate::models::auth::AuthenticatedUser;
use crate::routes::check_role;
use crate::{SERVICE_ADMIN_ROLE, SERVICE_MANAGER_ROLE, SERVICE_SALES_ROLE};

pub mod activity;
pub mod api;
pub mod calendar;
pub mod companies;
pub mod contacts;
pub mod documents;
pub mod errors;
pub mod import;
pub mod main;
pub mod opportunities;
pub mod settings;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

/// Fails with [`ServiceError::Unauthorized`] unless the user carries the
/// given role.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Fails unless the user carries any CRM role at all.
pub fn ensure_access(user: &AuthenticatedUser) -> ServiceResult<()> {
    let has_role = [SERVICE_ADMIN_ROLE, SERVICE_MANAGER_ROLE, SERVICE_SALES_ROLE]
        .iter()
        .any(|role| check_role(role, &user.roles));
    if has_role {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Admins and managers see every record; sales reps only see their own.
pub fn sees_all_records(user: &AuthenticatedUser) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles) || check_role(SERVICE_MANAGER_ROLE, &user.roles)
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod test_support {
    use crate::models::auth::AuthenticatedUser;

    pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    pub fn admin_user() -> AuthenticatedUser {
        user_with_roles(&["admin"])
    }

    pub fn sales_user() -> AuthenticatedUser {
        user_with_roles(&["sales"])
    }
}
