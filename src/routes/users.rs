use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::users::UsersQuery;
use crate::forms::users::{AddUserForm, EditUserForm};
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, users as users_service};

#[get("/users")]
pub async fn show_users(
    params: web::Query<UsersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users_service::list_users(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "users",
                &server_config.auth_service_url,
            );
            context.insert("users", &data.users);
            context.insert("branches", &data.branches);
            context.insert("user_types", &data.user_types);
            context.insert("search", &data.search);
            context.insert("user_type", &data.user_type);
            context.insert("branch_id", &data.branch_id);

            render_template(&tera, "users/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to list users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/users/{user_id}")]
pub async fn show_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users_service::show_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "users",
                &server_config.auth_service_url,
            );
            context.insert("user", &data.user);
            context.insert("branches", &data.branches);
            context.insert("user_types", &data.user_types);

            render_template(&tera, "users/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("User not found.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to load the user: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/users/add")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<AddUserForm>,
) -> impl Responder {
    match users_service::add_user(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success("User added.").send();
            redirect(&format!("/users/{}", created.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to add a user: {err}");
            FlashMessage::error("Failed to add the user.").send();
            redirect("/users")
        }
    }
}

#[post("/users/{user_id}/edit")]
pub async fn update_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<EditUserForm>,
) -> impl Responder {
    let user_id = user_id.into_inner();
    let page = format!("/users/{user_id}");

    match users_service::update_user(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        user_id,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("User updated.").send();
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
            FlashMessage::error("User not found.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to update the user: {err}");
            FlashMessage::error("Failed to update the user.").send();
            redirect(&page)
        }
    }
}

#[post("/users/{user_id}/toggle")]
pub async fn toggle_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    let user_id = user_id.into_inner();

    match users_service::toggle_user(repo.get_ref(), notifier.get_ref().as_ref(), &user, user_id) {
        Ok(true) => {
            FlashMessage::success("User activated.").send();
        }
        Ok(false) => {
            FlashMessage::success("User deactivated.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
            return redirect("/users");
        }
        Err(err) => {
            log::error!("Failed to toggle the user: {err}");
            FlashMessage::error("Failed to change the user status.").send();
        }
    }
    redirect(&format!("/users/{user_id}"))
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match users_service::delete_user(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        user_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("User deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete the user: {err}");
            FlashMessage::error("Failed to delete the user.").send();
        }
    }
    redirect("/users")
}
