use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, base_context, redirect, render_template};
use crate::services::{ServiceError, main as main_service};

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let now = Utc::now().naive_utc();

    match main_service::load_dashboard(repo.get_ref(), &user, now) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("profile", &data.profile);
            context.insert("site_alerts", &data.alerts);
            context.insert("news", &data.news);
            context.insert("events", &data.events);
            context.insert("stats", &data.stats);

            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
