use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::companies::CompaniesQuery;
use crate::forms::companies::{AddCompanyForm, SaveCompanyForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::companies as company_service;
use crate::services::settings::SettingsCache;

#[derive(Deserialize)]
struct CompaniesQueryParams {
    q: Option<String>,
    page: Option<usize>,
}

#[get("/companies")]
pub async fn show_companies(
    params: web::Query<CompaniesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<SettingsCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CompaniesQuery {
        search: params.q,
        page: params.page,
    };
    let per_page = settings.items_per_page(repo.as_ref());

    let data = match company_service::load_companies_page(repo.as_ref(), &user, query, per_page) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "companies",
        &server_config.auth_service_url,
    );
    context.insert("companies", &data.companies);
    if let Some(search_query) = &data.search_query {
        context.insert("search_query", search_query);
    }

    render_template(&tera, "companies/index.html", &context)
}

#[get("/company/{company_id}")]
pub async fn show_company(
    company_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data =
        match company_service::load_company_page(repo.as_ref(), &user, company_id.into_inner()) {
            Ok(data) => data,
            Err(err) => return service_error_response(err, "/companies"),
        };

    let mut context = base_context(
        &flash_messages,
        &user,
        "companies",
        &server_config.auth_service_url,
    );
    context.insert("company", &data.company);
    context.insert("contacts", &data.contacts);
    context.insert("opportunities", &data.opportunities);
    context.insert("documents", &data.documents);

    render_template(&tera, "companies/show.html", &context)
}

#[post("/company/add")]
pub async fn add_company(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCompanyForm>,
) -> impl Responder {
    match company_service::add_company(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Company added.").send();
            redirect("/companies")
        }
        Err(err) => service_error_response(err, "/companies"),
    }
}

#[post("/company/save")]
pub async fn save_company(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveCompanyForm>,
) -> impl Responder {
    let back = format!("/company/{}", form.id);
    match company_service::save_company(repo.as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Company updated.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[post("/company/{company_id}/delete")]
pub async fn delete_company(
    company_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match company_service::delete_company(repo.as_ref(), &user, company_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Company deleted.").send();
            redirect("/companies")
        }
        Err(err) => service_error_response(err, "/companies"),
    }
}
