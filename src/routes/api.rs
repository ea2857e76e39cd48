use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::{BranchesLookupQuery, EventsQuery, NewsFeedQuery};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

#[get("/v1/news")]
pub async fn api_v1_news(
    params: web::Query<NewsFeedQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::news_feed(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to load the news feed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/events")]
pub async fn api_v1_events(
    params: web::Query<EventsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let now = Utc::now().naive_utc();

    match api_service::list_events(repo.get_ref(), &user, params.into_inner(), now) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        Err(err) => {
            log::error!("Failed to list events: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/branches")]
pub async fn api_v1_branches(
    params: web::Query<BranchesLookupQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::lookup_branches(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to look up branches: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
