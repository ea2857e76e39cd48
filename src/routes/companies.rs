use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::companies::CompaniesQuery;
use crate::forms::companies::CompanyForm;
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, companies as companies_service};

#[get("/companies")]
pub async fn show_companies(
    params: web::Query<CompaniesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match companies_service::list_companies(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "companies",
                &server_config.auth_service_url,
            );
            context.insert("companies", &data.companies);
            context.insert("search", &data.search);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "companies/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list companies: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/companies/{company_id}")]
pub async fn show_company(
    company_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match companies_service::show_company(repo.get_ref(), &user, company_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "companies",
                &server_config.auth_service_url,
            );
            context.insert("company", &data.company);
            context.insert("products", &data.products);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "companies/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Company not found.").send();
            redirect("/companies")
        }
        Err(err) => {
            log::error!("Failed to load the company: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/companies/add")]
pub async fn add_company(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    match companies_service::add_company(repo.get_ref(), notifier.get_ref().as_ref(), &user, form)
    {
        Ok(company) => {
            FlashMessage::success("Company added.").send();
            redirect(&format!("/companies/{}", company.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/companies")
        }
        Err(err) => {
            log::error!("Failed to add a company: {err}");
            FlashMessage::error("Failed to add the company.").send();
            redirect("/companies")
        }
    }
}

#[post("/companies/{company_id}/edit")]
pub async fn update_company(
    company_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    let company_id = company_id.into_inner();
    let page = format!("/companies/{company_id}");

    match companies_service::update_company(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        company_id,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Company updated.").send();
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
            FlashMessage::error("Company not found.").send();
            redirect("/companies")
        }
        Err(err) => {
            log::error!("Failed to update the company: {err}");
            FlashMessage::error("Failed to update the company.").send();
            redirect(&page)
        }
    }
}

#[post("/companies/{company_id}/delete")]
pub async fn delete_company(
    company_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    let company_id = company_id.into_inner();

    match companies_service::delete_company(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        company_id,
    ) {
        Ok(()) => {
            FlashMessage::success("Company deleted.").send();
            redirect("/companies")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/companies/{company_id}"))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Company not found.").send();
            redirect("/companies")
        }
        Err(err) => {
            log::error!("Failed to delete the company: {err}");
            FlashMessage::error("Failed to delete the company.").send();
            redirect("/companies")
        }
    }
}
