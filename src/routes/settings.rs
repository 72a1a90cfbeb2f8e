use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::settings::SettingsForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::settings::{self as settings_service, SettingsCache};

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match settings_service::load_settings_page(repo.as_ref(), &user) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "settings",
        &server_config.auth_service_url,
    );
    context.insert("settings", &data.settings);

    render_template(&tera, "settings/index.html", &context)
}

#[post("/settings/save")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<SettingsCache>,
    body: String,
) -> impl Responder {
    // The form posts repeated key/value fields, which the urlencoded
    // extractor cannot represent.
    let form: SettingsForm = match serde_html_form::from_str(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse settings form: {err}");
            FlashMessage::error("Invalid settings form.").send();
            return redirect("/settings");
        }
    };

    match settings_service::save_settings(repo.as_ref(), settings.as_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("Settings saved.").send();
            redirect("/settings")
        }
        Err(err) => service_error_response(err, "/settings"),
    }
}
