use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::documents::UploadDocumentForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{redirect, service_error_response};
use crate::services::documents as document_service;

fn back_link(company_id: Option<i32>, contact_id: Option<i32>) -> String {
    match (contact_id, company_id) {
        (Some(contact_id), _) => format!("/contact/{contact_id}"),
        (None, Some(company_id)) => format!("/company/{company_id}"),
        (None, None) => "/".to_string(),
    }
}

#[post("/document/upload")]
pub async fn upload_document(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadDocumentForm>,
) -> impl Responder {
    let back = back_link(
        form.company_id.as_ref().map(|id| id.0),
        form.contact_id.as_ref().map(|id| id.0),
    );

    match document_service::upload_document(
        repo.as_ref(),
        &user,
        form,
        Path::new(&server_config.uploads_dir),
    ) {
        Ok(_) => {
            FlashMessage::success("Document uploaded.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[post("/document/{document_id}/delete")]
pub async fn delete_document(
    document_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match document_service::delete_document(
        repo.as_ref(),
        &user,
        document_id.into_inner(),
        Path::new(&server_config.uploads_dir),
    ) {
        Ok(()) => {
            FlashMessage::success("Document deleted.").send();
            redirect("/")
        }
        Err(err) => service_error_response(err, "/"),
    }
}
