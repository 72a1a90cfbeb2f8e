use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::activity::{Action, EntityType};
use crate::domain::document::{Document, NewDocument};
use crate::forms::documents::UploadDocumentForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ActivityWriter, DocumentReader, DocumentWriter, UserWriter};
use crate::routes::check_role;
use crate::services::{ServiceError, ServiceResult, activity, ensure_access, users};

/// Stores an uploaded file under the uploads directory and records its
/// metadata. The stored file gets a fresh UUID name; the user-supplied name
/// only survives in the title and the extension.
pub fn upload_document<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UploadDocumentForm,
    uploads_dir: &Path,
) -> ServiceResult<Document>
where
    R: DocumentWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let title = form.title.into_inner().trim().to_string();
    if title.is_empty() {
        return Err(ServiceError::Form("Document title is required".to_string()));
    }

    let company_id = form.company_id.map(|id| id.into_inner());
    let contact_id = form.contact_id.map(|id| id.into_inner());
    if company_id.is_none() && contact_id.is_none() {
        return Err(ServiceError::Form(
            "A document must be attached to a contact or a company".to_string(),
        ));
    }

    let local_user = users::sync_user(repo, user)?;

    let extension = form
        .file
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    let stored_name = format!("{}{extension}", Uuid::new_v4());

    let content_type = form
        .file
        .content_type
        .as_ref()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let size_bytes = form.file.size as i64;

    let destination = uploads_dir.join(&stored_name);
    std::fs::create_dir_all(uploads_dir)
        .and_then(|()| std::fs::copy(form.file.file.path(), &destination))
        .map_err(|err| {
            log::error!("Failed to store uploaded file: {err}");
            ServiceError::Internal("Failed to store uploaded file".to_string())
        })?;

    let new_document = NewDocument::new(
        company_id,
        contact_id,
        local_user.id,
        title,
        stored_name,
        content_type,
        size_bytes,
    );

    let document = match repo.create_document(&new_document) {
        Ok(document) => document,
        Err(err) => {
            // Do not leave orphaned files behind when the row insert fails.
            if let Err(remove_err) = std::fs::remove_file(&destination) {
                log::error!("Failed to remove orphaned upload: {remove_err}");
            }
            log::error!("Failed to record document: {err}");
            return Err(ServiceError::from(err));
        }
    };

    activity::record(
        repo,
        local_user.id,
        EntityType::Document,
        document.id,
        Action::Created,
        json!({ "title": document.title }),
    );

    Ok(document)
}

/// Removes a document row and its stored file. Allowed for the uploader and
/// for admins.
pub fn delete_document<R>(
    repo: &R,
    user: &AuthenticatedUser,
    document_id: i32,
    uploads_dir: &Path,
) -> ServiceResult<()>
where
    R: DocumentReader + DocumentWriter + ActivityWriter + UserWriter + ?Sized,
{
    ensure_access(user)?;

    let document = repo
        .get_document_by_id(document_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let local_user = users::sync_user(repo, user)?;

    if document.uploaded_by != local_user.id && !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_document(document_id).map_err(|err| {
        log::error!("Failed to delete document: {err}");
        ServiceError::from(err)
    })?;

    // The row is gone; a leftover file is only worth a log line.
    let stored = uploads_dir.join(&document.file_name);
    if stored.exists()
        && let Err(err) = std::fs::remove_file(&stored)
    {
        log::error!("Failed to remove stored file: {err}");
    }

    activity::record(
        repo,
        local_user.id,
        EntityType::Document,
        document_id,
        Action::Deleted,
        json!({ "title": document.title }),
    );

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{sales_user, user_with_roles};
    use chrono::Utc;

    fn stub_sync(repo: &mut MockRepository, id: i32) {
        repo.expect_create_or_update_user().returning(move |new_user| {
            Ok(User {
                id,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                role: new_user.role.clone(),
                created_at: Utc::now().naive_utc(),
            })
        });
    }

    fn document_uploaded_by(uploaded_by: i32) -> Document {
        Document {
            id: 3,
            uploaded_by,
            title: "Contract".to_string(),
            file_name: "missing.pdf".to_string(),
            ..Document::default()
        }
    }

    #[test]
    fn uploader_can_delete_own_document() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_get_document_by_id()
            .returning(|_| Ok(Some(document_uploaded_by(5))));
        repo.expect_delete_document().returning(|_| Ok(()));
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

        delete_document(&repo, &sales_user(), 3, Path::new("/tmp/uploads-test"))
            .expect("delete succeeds");
    }

    #[test]
    fn foreign_document_needs_admin() {
        let mut repo = MockRepository::new();
        stub_sync(&mut repo, 5);
        repo.expect_get_document_by_id()
            .returning(|_| Ok(Some(document_uploaded_by(7))));
        repo.expect_delete_document().times(0);

        let result = delete_document(&repo, &sales_user(), 3, Path::new("/tmp/uploads-test"));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));

        let result = delete_document(
            &repo,
            &user_with_roles(&["billing"]),
            3,
            Path::new("/tmp/uploads-test"),
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
