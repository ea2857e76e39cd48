use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::news::{NewsEditorData, NewsPageData, NewsQuery};
use crate::forms::news::NewsForm;
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{INSUFFICIENT_PERMISSIONS, Notifier, base_context, redirect, render_template};
use crate::services::{ServiceError, ServiceResult, news as news_service};

fn render_news_list(
    result: ServiceResult<NewsPageData>,
    template: &str,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    server_config: &CommonServerConfig,
    tera: &Tera,
) -> HttpResponse {
    match result {
        Ok(data) => {
            let mut context =
                base_context(flash_messages, user, "news", &server_config.auth_service_url);
            context.insert("news", &data.news);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            context.insert("can_edit", &data.can_edit);

            render_template(tera, template, &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list news: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn render_editor(
    result: ServiceResult<NewsEditorData>,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    server_config: &CommonServerConfig,
    tera: &Tera,
) -> HttpResponse {
    match result {
        Ok(data) => {
            let mut context =
                base_context(flash_messages, user, "news", &server_config.auth_service_url);
            context.insert("post", &data.post);
            context.insert("branches", &data.branches);
            context.insert("user_types", &data.user_types);
            context.insert("categories", &data.categories);
            context.insert("selected_branches", &data.selected_branches);
            context.insert("selected_user_types", &data.selected_user_types);
            context.insert("visibility", &data.visibility);

            render_template(tera, "news/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("News post not found.").send();
            redirect("/news/manage")
        }
        Err(err) => {
            log::error!("Failed to load the news editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/news")]
pub async fn show_news_feed(
    params: web::Query<NewsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = news_service::news_feed(repo.get_ref(), &user, params.into_inner());
    render_news_list(
        result,
        "news/index.html",
        &user,
        &flash_messages,
        &server_config,
        &tera,
    )
}

#[get("/news/manage")]
pub async fn manage_news(
    params: web::Query<NewsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = news_service::manage_news(repo.get_ref(), &user, params.into_inner());
    render_news_list(
        result,
        "news/manage.html",
        &user,
        &flash_messages,
        &server_config,
        &tera,
    )
}

#[get("/news/new")]
pub async fn new_news(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = news_service::load_news_editor(repo.get_ref(), &user, None);
    render_editor(result, &user, &flash_messages, &server_config, &tera)
}

/// The editor posts repeated `branch_ids`/`user_types` keys, so the body is
/// taken raw and decoded by the form.
#[post("/news/new")]
pub async fn create_news(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    body: web::Bytes,
) -> impl Responder {
    let form = match NewsForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/news/new");
        }
    };

    match news_service::create_news(repo.get_ref(), notifier.get_ref().as_ref(), &user, form) {
        Ok(post) => {
            FlashMessage::success("News post saved.").send();
            redirect(&format!("/news/{}", post.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/news/new")
        }
        Err(err) => {
            log::error!("Failed to create a news post: {err}");
            FlashMessage::error("Failed to save the news post.").send();
            redirect("/news/manage")
        }
    }
}

#[get("/news/{news_id}")]
pub async fn show_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match news_service::show_news(repo.get_ref(), &user, news_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "news",
                &server_config.auth_service_url,
            );
            context.insert("post", &data.post);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "news/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("News post not found.").send();
            redirect("/news")
        }
        Err(err) => {
            log::error!("Failed to load the news post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/news/{news_id}/edit")]
pub async fn edit_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = news_service::load_news_editor(repo.get_ref(), &user, Some(news_id.into_inner()));
    render_editor(result, &user, &flash_messages, &server_config, &tera)
}

#[post("/news/{news_id}/edit")]
pub async fn update_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    body: web::Bytes,
) -> impl Responder {
    let news_id = news_id.into_inner();
    let editor = format!("/news/{news_id}/edit");

    let form = match NewsForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&editor);
        }
    };

    match news_service::update_news(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        news_id,
        form,
    ) {
        Ok(post) => {
            FlashMessage::success("News post updated.").send();
            redirect(&format!("/news/{}", post.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&editor)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("News post not found.").send();
            redirect("/news/manage")
        }
        Err(err) => {
            log::error!("Failed to update the news post: {err}");
            FlashMessage::error("Failed to update the news post.").send();
            redirect(&editor)
        }
    }
}

#[post("/news/{news_id}/delete")]
pub async fn delete_news(
    news_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
) -> impl Responder {
    match news_service::delete_news(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        news_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("News post deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("News post not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete the news post: {err}");
            FlashMessage::error("Failed to delete the news post.").send();
        }
    }
    redirect("/news/manage")
}
