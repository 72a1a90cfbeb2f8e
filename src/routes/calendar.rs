use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::calendar::CalendarQuery;
use crate::forms::calendar::AddReminderForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::calendar as calendar_service;

#[derive(Deserialize)]
struct CalendarQueryParams {
    year: Option<i32>,
    month: Option<u32>,
}

#[derive(Deserialize)]
struct DoneParams {
    #[serde(default)]
    done: Option<bool>,
}

#[get("/calendar")]
pub async fn show_calendar(
    params: web::Query<CalendarQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CalendarQuery {
        year: params.year,
        month: params.month,
    };

    let data = match calendar_service::load_calendar_page(repo.as_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "calendar",
        &server_config.auth_service_url,
    );
    context.insert("year", &data.year);
    context.insert("month", &data.month);
    context.insert("weeks", &data.weeks);
    context.insert("prev", &data.prev);
    context.insert("next", &data.next);
    context.insert("contacts", &data.contacts);

    render_template(&tera, "calendar/index.html", &context)
}

#[post("/reminder/add")]
pub async fn add_reminder(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReminderForm>,
) -> impl Responder {
    match calendar_service::add_reminder(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Reminder scheduled.").send();
            redirect("/calendar")
        }
        Err(err) => service_error_response(err, "/calendar"),
    }
}

#[post("/reminder/{reminder_id}/done")]
pub async fn complete_reminder(
    reminder_id: web::Path<i32>,
    params: web::Query<DoneParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let done = params.done.unwrap_or(true);
    match calendar_service::set_reminder_done(repo.as_ref(), &user, reminder_id.into_inner(), done)
    {
        Ok(_) => redirect("/calendar"),
        Err(err) => service_error_response(err, "/calendar"),
    }
}

#[post("/reminder/{reminder_id}/delete")]
pub async fn delete_reminder(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match calendar_service::delete_reminder(repo.as_ref(), &user, reminder_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Reminder deleted.").send();
            redirect("/calendar")
        }
        Err(err) => service_error_response(err, "/calendar"),
    }
}
