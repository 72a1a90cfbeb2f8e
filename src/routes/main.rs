use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::main as main_service;
use crate::services::settings::{self as settings_service, SettingsCache};

#[derive(Deserialize)]
struct AuthCallbackParams {
    token: String,
}

#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<SettingsCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match main_service::load_dashboard(repo.as_ref(), &user) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let (company_name, currency) =
        match settings_service::branding(repo.as_ref(), settings.as_ref(), &user) {
            Ok(branding) => branding,
            Err(err) => return service_error_response(err, "/"),
        };

    let mut context = base_context(
        &flash_messages,
        &user,
        "dashboard",
        &server_config.auth_service_url,
    );
    context.insert("company_name", &company_name);
    context.insert("currency", &currency);
    context.insert("contact_total", &data.contact_total);
    context.insert("company_total", &data.company_total);
    context.insert("pipeline", &data.pipeline);
    context.insert("due_today", &data.due_today);
    context.insert("recent_activity", &data.recent_activity);

    render_template(&tera, "main/dashboard.html", &context)
}

/// Completes sign-in: the auth service redirects here with a signed token,
/// which becomes the identity cookie.
#[get("/auth/callback")]
pub async fn auth_callback(
    req: HttpRequest,
    params: web::Query<AuthCallbackParams>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match AuthenticatedUser::from_jwt(&params.token, &server_config.secret) {
        Ok(_) => {
            if let Err(err) = Identity::login(&req.extensions(), params.token.clone()) {
                log::error!("Failed to establish identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/")
        }
        Err(err) => {
            log::error!("Rejected auth callback token: {err}");
            redirect(&server_config.auth_service_url)
        }
    }
}

/// Entry point of the sign-in flow: hands the browser to the auth service,
/// which calls back with a token.
#[get("/auth/signin")]
pub async fn signin(server_config: web::Data<ServerConfig>) -> impl Responder {
    redirect(&server_config.auth_service_url)
}

#[get("/logout")]
pub async fn logout(
    identity: Option<Identity>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect(&server_config.auth_service_url)
}

#[derive(Deserialize)]
struct ActivityQueryParams {
    page: Option<usize>,
}

#[get("/activity")]
pub async fn show_activity(
    params: web::Query<ActivityQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<SettingsCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = crate::dto::activity::ActivityQuery {
        page: params.page,
    };
    let per_page = settings.items_per_page(repo.as_ref());

    let data =
        match crate::services::activity::load_activity_page(repo.as_ref(), &user, query, per_page)
        {
            Ok(data) => data,
            Err(err) => return service_error_response(err, "/"),
        };

    let mut context = base_context(
        &flash_messages,
        &user,
        "activity",
        &server_config.auth_service_url,
    );
    context.insert("entries", &data.entries);

    render_template(&tera, "activity/index.html", &context)
}

/// Landing page for signed-in users without any CRM role.
#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "na",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}
