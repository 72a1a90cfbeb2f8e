use crate::domain::user::{NewUser, User};
use crate::models::auth::AuthenticatedUser;
use crate::repository::UserWriter;
use crate::services::{ServiceError, ServiceResult};

/// Upserts the local row mirroring the authenticated user and returns it.
/// Services call this to obtain the local identifier used for ownership
/// and activity logging.
pub fn sync_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    repo.create_or_update_user(&NewUser::from(user))
        .map_err(|err| {
            log::error!("Failed to sync user: {err}");
            ServiceError::from(err)
        })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::admin_user;
    use chrono::Utc;

    #[test]
    fn sync_user_upserts_from_token() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .withf(|new_user: &NewUser| {
                new_user.email == "user@example.com" && new_user.role == "admin"
            })
            .returning(|new_user| {
                Ok(User {
                    id: 1,
                    name: new_user.name.clone(),
                    email: new_user.email.clone(),
                    role: new_user.role.clone(),
                    created_at: Utc::now().naive_utc(),
                })
            });

        let user = sync_user(&repo, &admin_user()).expect("sync succeeds");
        assert_eq!(user.id, 1);
        assert_eq!(user.role, "admin");
    }
}
