use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::products::ProductsQuery;
use crate::forms::products::ProductForm;
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, products as products_service};

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::list_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("companies", &data.companies);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            context.insert("company_id", &data.company_id);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Invalid filter.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::show_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("product", &data.product);
            context.insert("company", &data.company);
            context.insert("companies", &data.companies);
            context.insert("categories", &data.categories);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "products/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to load the product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    match products_service::add_product(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success("Product added.").send();
            redirect(&format!("/products/{}", product.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Conflict(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to add a product: {err}");
            FlashMessage::error("Failed to add the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/{product_id}/edit")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let page = format!("/products/{product_id}");

    match products_service::update_product(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        product_id,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Product updated.").send();
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
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to update the product: {err}");
            FlashMessage::error("Failed to update the product.").send();
            redirect(&page)
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match products_service::delete_product(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        product_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to delete the product: {err}");
            FlashMessage::error("Failed to delete the product.").send();
            redirect("/products")
        }
    }
}
