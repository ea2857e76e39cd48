use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::alerts::AlertForm;
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, alerts as alerts_service};

#[get("/alerts")]
pub async fn show_alerts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let now = Utc::now().naive_utc();

    match alerts_service::list_alerts(repo.get_ref(), &user, now) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "alerts",
                &server_config.auth_service_url,
            );
            context.insert("site_alerts", &data.alerts);

            render_template(&tera, "alerts/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list alerts: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/alerts/add")]
pub async fn add_alert(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<AlertForm>,
) -> impl Responder {
    match alerts_service::add_alert(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Alert added.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add an alert: {err}");
            FlashMessage::error("Failed to add the alert.").send();
        }
    }
    redirect("/alerts")
}

#[post("/alerts/{alert_id}/edit")]
pub async fn update_alert(
    alert_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<AlertForm>,
) -> impl Responder {
    match alerts_service::update_alert(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        alert_id.into_inner(),
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Alert updated.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Alert not found.").send();
        }
        Err(err) => {
            log::error!("Failed to update the alert: {err}");
            FlashMessage::error("Failed to update the alert.").send();
        }
    }
    redirect("/alerts")
}

#[post("/alerts/{alert_id}/toggle")]
pub async fn toggle_alert(
    alert_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match alerts_service::toggle_alert(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        alert_id.into_inner(),
    ) {
        Ok(true) => {
            FlashMessage::success("Alert switched on.").send();
        }
        Ok(false) => {
            FlashMessage::success("Alert switched off.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Alert not found.").send();
        }
        Err(err) => {
            log::error!("Failed to toggle the alert: {err}");
            FlashMessage::error("Failed to toggle the alert.").send();
        }
    }
    redirect("/alerts")
}

#[post("/alerts/{alert_id}/delete")]
pub async fn delete_alert(
    alert_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match alerts_service::delete_alert(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        alert_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Alert deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(err) => {
            log::error!("Failed to delete the alert: {err}");
            FlashMessage::error("Failed to delete the alert.").send();
        }
    }
    redirect("/alerts")
}
