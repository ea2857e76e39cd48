use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::calendar::{CalendarQuery, EventForm};
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, calendar as calendar_service};

#[get("/calendar")]
pub async fn show_calendar(
    params: web::Query<CalendarQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let now = Utc::now().naive_utc();

    match calendar_service::month_view(repo.get_ref(), &user, params.into_inner(), now) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "calendar",
                &server_config.auth_service_url,
            );
            context.insert("month", &data.month);
            context.insert("previous", &data.previous);
            context.insert("next", &data.next);
            context.insert("weeks", &data.weeks);
            context.insert("events", &data.events);
            context.insert("branches", &data.branches);
            context.insert("branch_id", &data.branch_id);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "calendar/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Invalid month.").send();
            redirect("/calendar")
        }
        Err(err) => {
            log::error!("Failed to load the calendar: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/calendar/events/{event_id}")]
pub async fn show_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match calendar_service::show_event(repo.get_ref(), &user, event_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "calendar",
                &server_config.auth_service_url,
            );
            context.insert("event", &data.event);
            context.insert("branch", &data.branch);
            context.insert("branches", &data.branches);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "calendar/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Event not found.").send();
            redirect("/calendar")
        }
        Err(err) => {
            log::error!("Failed to load the event: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/calendar/events/add")]
pub async fn add_event(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<EventForm>,
) -> impl Responder {
    match calendar_service::add_event(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(event) => {
            FlashMessage::success("Event added.").send();
            redirect(&format!("/calendar/events/{}", event.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/calendar")
        }
        Err(err) => {
            log::error!("Failed to add an event: {err}");
            FlashMessage::error("Failed to add the event.").send();
            redirect("/calendar")
        }
    }
}

#[post("/calendar/events/{event_id}/edit")]
pub async fn update_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<EventForm>,
) -> impl Responder {
    let event_id = event_id.into_inner();
    let page = format!("/calendar/events/{event_id}");

    match calendar_service::update_event(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        event_id,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Event updated.").send();
            redirect(&page)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&page)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Event not found.").send();
            redirect("/calendar")
        }
        Err(err) => {
            log::error!("Failed to update the event: {err}");
            FlashMessage::error("Failed to update the event.").send();
            redirect(&page)
        }
    }
}

#[post("/calendar/events/{event_id}/delete")]
pub async fn delete_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match calendar_service::delete_event(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        event_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Event deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Event not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete the event: {err}");
            FlashMessage::error("Failed to delete the event.").send();
        }
    }
    redirect("/calendar")
}
