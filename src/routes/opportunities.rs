use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::opportunities::{AddOpportunityForm, MoveOpportunityForm, SaveOpportunityForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::opportunities as opportunity_service;

#[get("/board")]
pub async fn show_board(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match opportunity_service::load_board_page(repo.as_ref(), &user) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "board",
        &server_config.auth_service_url,
    );
    context.insert("columns", &data.columns);
    context.insert("companies", &data.companies);
    context.insert("contacts", &data.contacts);

    render_template(&tera, "opportunities/board.html", &context)
}

#[post("/opportunity/add")]
pub async fn add_opportunity(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddOpportunityForm>,
) -> impl Responder {
    match opportunity_service::add_opportunity(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Opportunity added.").send();
            redirect("/board")
        }
        Err(err) => service_error_response(err, "/board"),
    }
}

#[post("/opportunity/save")]
pub async fn save_opportunity(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveOpportunityForm>,
) -> impl Responder {
    match opportunity_service::save_opportunity(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Opportunity updated.").send();
            redirect("/board")
        }
        Err(err) => service_error_response(err, "/board"),
    }
}

/// Drag-and-drop handler; answers JSON so the board updates in place.
#[post("/opportunity/move")]
pub async fn move_opportunity(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<MoveOpportunityForm>,
) -> impl Responder {
    match opportunity_service::move_opportunity(repo.as_ref(), &user, &form) {
        Ok(moved) => actix_web::HttpResponse::Ok().json(moved),
        Err(err) => service_error_response(err, "/board"),
    }
}

#[post("/opportunity/{opportunity_id}/delete")]
pub async fn delete_opportunity(
    opportunity_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match opportunity_service::delete_opportunity(repo.as_ref(), &user, opportunity_id.into_inner())
    {
        Ok(()) => {
            FlashMessage::success("Opportunity deleted.").send();
            redirect("/board")
        }
        Err(err) => service_error_response(err, "/board"),
    }
}
