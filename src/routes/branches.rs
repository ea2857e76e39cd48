use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::branches::BranchesQuery;
use crate::forms::branches::{BranchForm, UploadBranchesForm};
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, branches as branches_service};

#[get("/branches")]
pub async fn show_branches(
    params: web::Query<BranchesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match branches_service::list_branches(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "branches",
                &server_config.auth_service_url,
            );
            context.insert("branches", &data.branches);
            context.insert("cities", &data.cities);
            context.insert("search", &data.search);
            context.insert("city", &data.city);
            context.insert("active_only", &data.active_only);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "branches/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list branches: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/branches/{branch_id}")]
pub async fn show_branch(
    branch_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match branches_service::show_branch(repo.get_ref(), &user, branch_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "branches",
                &server_config.auth_service_url,
            );
            context.insert("branch", &data.branch);
            context.insert("staff", &data.staff);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "branches/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Branch not found.").send();
            redirect("/branches")
        }
        Err(err) => {
            log::error!("Failed to load the branch: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/branches/add")]
pub async fn add_branch(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<BranchForm>,
) -> impl Responder {
    match branches_service::add_branch(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(branch) => {
            FlashMessage::success("Branch added.").send();
            redirect(&format!("/branches/{}", branch.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/branches")
        }
        Err(err) => {
            log::error!("Failed to add a branch: {err}");
            FlashMessage::error("Failed to add the branch.").send();
            redirect("/branches")
        }
    }
}

#[post("/branches/upload")]
pub async fn upload_branches(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    MultipartForm(form): MultipartForm<UploadBranchesForm>,
) -> impl Responder {
    match branches_service::import_branches(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        &form,
    ) {
        Ok(inserted) => {
            FlashMessage::success(format!("Branches imported: {inserted}.")).send();
            redirect("/branches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Failed to parse branches: {message}")).send();
            redirect("/branches")
        }
        Err(err) => {
            log::error!("Failed to import branches: {err}");
            FlashMessage::error("Failed to import branches.").send();
            redirect("/branches")
        }
    }
}

#[post("/branches/{branch_id}/edit")]
pub async fn update_branch(
    branch_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<BranchForm>,
) -> impl Responder {
    let branch_id = branch_id.into_inner();
    let page = format!("/branches/{branch_id}");

    match branches_service::update_branch(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        branch_id,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Branch updated.").send();
            redirect(&page)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect(&page)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Branch not found.").send();
            redirect("/branches")
        }
        Err(err) => {
            log::error!("Failed to update the branch: {err}");
            FlashMessage::error("Failed to update the branch.").send();
            redirect(&page)
        }
    }
}

#[post("/branches/{branch_id}/delete")]
pub async fn delete_branch(
    branch_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match branches_service::delete_branch(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        branch_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Branch deleted.").send();
            redirect("/branches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Branch not found.").send();
            redirect("/branches")
        }
        Err(err) => {
            log::error!("Failed to delete the branch: {err}");
            FlashMessage::error("Failed to delete the branch.").send();
            redirect("/branches")
        }
    }
}
