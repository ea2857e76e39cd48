//! HTTP handlers. Pages render Tera templates, the `/api` scope returns JSON.

use std::sync::Arc;

use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::changes::ChangeNotifier;
use crate::domain::auth::AuthenticatedUser;
use crate::models::config::CommonServerConfig;
use crate::services::is_admin;
use crate::storage::FileStorage;

pub mod alerts;
pub mod api;
pub mod branches;
pub mod calendar;
pub mod companies;
pub mod documents;
pub mod main;
pub mod news;
pub mod products;
pub mod users;

/// Change feed handle shared by all workers.
pub type Notifier = web::Data<Arc<dyn ChangeNotifier>>;
/// Document storage handle shared by all workers.
pub type Storage = web::Data<Arc<dyn FileStorage>>;

pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions.";

/// Maps flash levels onto Bootstrap alert classes.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: flash alerts, the current user and navigation.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context.insert("is_admin", &is_admin(user));
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}

/// Landing page for signed-in users without intranet access.
#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );

    render_template(&tera, "main/not_assigned.html", &context)
}
