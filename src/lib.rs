//! Franchise network intranet: branches, partner companies, a product
//! knowledge base, documents, news, a calendar and site-wide alerts.

#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::changes::{ChangeNotifier, NoopNotifier, ZmqChangePublisher};
#[cfg(feature = "server")]
use crate::db::{establish_connection_pool, run_migrations};
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::{CommonServerConfig, ServerConfig};
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::{
    alerts, api, branches, calendar, companies, documents, main, news, products, users,
};
#[cfg(feature = "server")]
use crate::routes::{logout, not_assigned};
#[cfg(feature = "server")]
use crate::storage::{FileStorage, LocalFileStorage};

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod changes;
pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;

pub const SERVICE_ACCESS_ROLE: &str = "intranet";
pub const SERVICE_ADMIN_ROLE: &str = "intranet_admin";

/// URL prefix of stored uploads, served only to signed-in readers.
pub const UPLOADS_PATH: &str = "/uploads";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let common_config = CommonServerConfig::from(&server_config);

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;
    run_migrations(&pool)
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;

    let repo = DieselRepository::new(pool);

    let notifier: Arc<dyn ChangeNotifier> = match server_config.zmq_changes_pub.as_deref() {
        Some(endpoint) if !endpoint.trim().is_empty() => Arc::new(
            ZmqChangePublisher::bind(endpoint).map_err(|e| {
                std::io::Error::other(format!("Failed to start ZMQ publisher: {e}"))
            })?,
        ),
        _ => {
            log::info!("Change feed endpoint is not configured, changes are not published");
            Arc::new(NoopNotifier)
        }
    };

    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(
        &server_config.upload_dir,
        UPLOADS_PATH,
    )?);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

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
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api::api_v1_news)
                    .service(api::api_v1_events)
                    .service(api::api_v1_branches),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(main::show_index)
                    .service(branches::show_branches)
                    .service(branches::add_branch)
                    .service(branches::upload_branches)
                    .service(branches::show_branch)
                    .service(branches::update_branch)
                    .service(branches::delete_branch)
                    .service(companies::show_companies)
                    .service(companies::add_company)
                    .service(companies::show_company)
                    .service(companies::update_company)
                    .service(companies::delete_company)
                    .service(products::show_products)
                    .service(products::add_product)
                    .service(products::show_product)
                    .service(products::update_product)
                    .service(products::delete_product)
                    .service(documents::show_documents)
                    .service(documents::upload_document)
                    .service(documents::update_document)
                    .service(documents::delete_document)
                    .service(documents::download_document)
                    .service(documents::serve_upload)
                    .service(news::show_news_feed)
                    .service(news::manage_news)
                    .service(news::new_news)
                    .service(news::create_news)
                    .service(news::show_news)
                    .service(news::edit_news)
                    .service(news::update_news)
                    .service(news::delete_news)
                    .service(calendar::show_calendar)
                    .service(calendar::add_event)
                    .service(calendar::show_event)
                    .service(calendar::update_event)
                    .service(calendar::delete_event)
                    .service(users::show_users)
                    .service(users::add_user)
                    .service(users::show_user)
                    .service(users::update_user)
                    .service(users::toggle_user)
                    .service(users::delete_user)
                    .service(alerts::show_alerts)
                    .service(alerts::add_alert)
                    .service(alerts::update_alert)
                    .service(alerts::toggle_alert)
                    .service(alerts::delete_alert)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
