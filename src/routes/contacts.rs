use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::contacts::ContactsQuery;
use crate::forms::contacts::{AddContactForm, SaveContactForm, UploadContactsForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::contacts as contact_service;
use crate::services::import::{self as import_service, ImportQueue};
use crate::services::settings::SettingsCache;

#[derive(Deserialize)]
struct ContactsQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[get("/contacts")]
pub async fn show_contacts(
    params: web::Query<ContactsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<SettingsCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = ContactsQuery {
        search: params.q,
        page: params.page,
    };
    let per_page = settings.items_per_page(repo.as_ref());

    let data = match contact_service::load_contacts_page(repo.as_ref(), &user, query, per_page) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "contacts",
        &server_config.auth_service_url,
    );
    context.insert("contacts", &data.contacts);
    context.insert("companies", &data.companies);
    if let Some(search_query) = &data.search_query {
        context.insert("search_query", search_query);
    }

    render_template(&tera, "contacts/index.html", &context)
}

#[get("/contact/{contact_id}")]
pub async fn show_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data =
        match contact_service::load_contact_page(repo.as_ref(), &user, contact_id.into_inner()) {
            Ok(data) => data,
            Err(err) => return service_error_response(err, "/contacts"),
        };

    let mut context = base_context(
        &flash_messages,
        &user,
        "contacts",
        &server_config.auth_service_url,
    );
    context.insert("contact", &data.contact);
    context.insert("company", &data.company);
    context.insert("companies", &data.companies);
    context.insert("documents", &data.documents);
    context.insert("reminders", &data.reminders);
    context.insert("activity", &data.activity);

    render_template(&tera, "contacts/show.html", &context)
}

#[post("/contact/add")]
pub async fn add_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddContactForm>,
) -> impl Responder {
    match contact_service::add_contact(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Contact added.").send();
            redirect("/contacts")
        }
        Err(err) => service_error_response(err, "/contacts"),
    }
}

#[post("/contact/save")]
pub async fn save_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveContactForm>,
) -> impl Responder {
    let back = format!("/contact/{}", form.id);
    match contact_service::save_contact(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Contact updated.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[post("/contact/{contact_id}/delete")]
pub async fn delete_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contact_service::delete_contact(repo.as_ref(), &user, contact_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Contact deleted.").send();
            redirect("/contacts")
        }
        Err(err) => service_error_response(err, "/contacts"),
    }
}

#[post("/contacts/upload")]
pub async fn upload_contacts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    queue: web::Data<ImportQueue>,
    MultipartForm(form): MultipartForm<UploadContactsForm>,
) -> impl Responder {
    match import_service::enqueue_import(repo.as_ref(), queue.as_ref(), &user, form) {
        Ok(job) => {
            FlashMessage::success("Import queued.").send();
            redirect(&format!("/imports/{}", job.id))
        }
        Err(err) => service_error_response(err, "/imports"),
    }
}

#[get("/imports")]
pub async fn show_imports(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match import_service::load_import_jobs_page(repo.as_ref(), &user) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "imports",
        &server_config.auth_service_url,
    );
    context.insert("jobs", &data.jobs);

    render_template(&tera, "imports/index.html", &context)
}

#[get("/imports/{job_id}")]
pub async fn show_import(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data =
        match import_service::load_import_job_page(repo.as_ref(), &user, job_id.into_inner()) {
            Ok(data) => data,
            Err(err) => return service_error_response(err, "/imports"),
        };

    let mut context = base_context(
        &flash_messages,
        &user,
        "imports",
        &server_config.auth_service_url,
    );
    context.insert("job", &data.job);
    context.insert("failures", &data.failures);

    render_template(&tera, "imports/show.html", &context)
}

#[post("/imports/{job_id}/cancel")]
pub async fn cancel_import(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let job_id = job_id.into_inner();
    let back = format!("/imports/{job_id}");
    match import_service::cancel_import(repo.as_ref(), &user, job_id) {
        Ok(_) => {
            FlashMessage::success("Cancellation requested.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}
