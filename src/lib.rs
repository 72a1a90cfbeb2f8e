use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::{
    api_v1_activity, api_v1_calendar, api_v1_companies, api_v1_contacts, api_v1_opportunities,
};
use crate::routes::calendar::{add_reminder, complete_reminder, delete_reminder, show_calendar};
use crate::routes::companies::{
    add_company, delete_company, save_company, show_companies, show_company,
};
use crate::routes::contacts::{
    add_contact, cancel_import, delete_contact, save_contact, show_contact, show_contacts,
    show_import, show_imports, upload_contacts,
};
use crate::routes::documents::{delete_document, upload_document};
use crate::routes::main::{auth_callback, logout, not_assigned, show_activity, show_dashboard, signin};
use crate::routes::opportunities::{
    add_opportunity, delete_opportunity, move_opportunity, save_opportunity, show_board,
};
use crate::routes::settings::{save_settings, show_settings};
use crate::services::import::start_import_worker;
use crate::services::settings::SettingsCache;

pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

pub const SERVICE_ADMIN_ROLE: &str = "admin";
pub const SERVICE_MANAGER_ROLE: &str = "manager";
pub const SERVICE_SALES_ROLE: &str = "sales";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Background worker that drains the CSV import queue.
    let import_queue = start_import_worker(repo.clone());

    let settings_cache = web::Data::new(SettingsCache::new());

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let uploads_dir = server_config.uploads_dir.clone();
    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/uploads", uploads_dir.clone()))
            .service(not_assigned)
            .service(signin)
            .service(auth_callback)
            .service(
                web::scope("/api")
                    .service(api_v1_contacts)
                    .service(api_v1_companies)
                    .service(api_v1_opportunities)
                    .service(api_v1_calendar)
                    .service(api_v1_activity),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_activity)
                    .service(show_contacts)
                    .service(show_contact)
                    .service(add_contact)
                    .service(save_contact)
                    .service(delete_contact)
                    .service(upload_contacts)
                    .service(show_imports)
                    .service(show_import)
                    .service(cancel_import)
                    .service(show_companies)
                    .service(show_company)
                    .service(add_company)
                    .service(save_company)
                    .service(delete_company)
                    .service(upload_document)
                    .service(delete_document)
                    .service(show_board)
                    .service(add_opportunity)
                    .service(save_opportunity)
                    .service(move_opportunity)
                    .service(delete_opportunity)
                    .service(show_calendar)
                    .service(add_reminder)
                    .service(complete_reminder)
                    .service(delete_reminder)
                    .service(show_settings)
                    .service(save_settings)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(import_queue.clone()))
            .app_data(settings_cache.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
