use actix_files::NamedFile;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::documents::DocumentsQuery;
use crate::forms::documents::{DocumentForm, UploadDocumentForm};
use crate::models::config::CommonServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    INSUFFICIENT_PERMISSIONS, Notifier, Storage, base_context, redirect, render_template,
};
use crate::services::{ServiceError, documents as documents_service};

#[get("/documents")]
pub async fn show_documents(
    params: web::Query<DocumentsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: Storage,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match documents_service::list_documents(
        repo.get_ref(),
        storage.get_ref().as_ref(),
        &user,
        params.into_inner(),
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "documents",
                &server_config.auth_service_url,
            );
            context.insert("documents", &data.documents);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            context.insert("can_edit", &data.can_edit);

            render_template(&tera, "documents/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list documents: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/documents/upload")]
pub async fn upload_document(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: Storage,
    notifier: Notifier,
    MultipartForm(form): MultipartForm<UploadDocumentForm>,
) -> impl Responder {
    match documents_service::upload_document(
        repo.get_ref(),
        storage.get_ref().as_ref(),
        notifier.get_ref().as_ref(),
        &user,
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Document uploaded.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to upload a document: {err}");
            FlashMessage::error("Failed to upload the document.").send();
        }
    }
    redirect("/documents")
}

#[post("/documents/{document_id}/edit")]
pub async fn update_document(
    document_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: Notifier,
    web::Form(form): web::Form<DocumentForm>,
) -> impl Responder {
    match documents_service::update_document(
        repo.get_ref(),
        notifier.get_ref().as_ref(),
        &user,
        document_id.into_inner(),
        form,
    ) {
        Ok(_) => {
            FlashMessage::success("Document updated.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Document not found.").send();
        }
        Err(err) => {
            log::error!("Failed to update the document: {err}");
            FlashMessage::error("Failed to update the document.").send();
        }
    }
    redirect("/documents")
}

#[post("/documents/{document_id}/delete")]
pub async fn delete_document(
    document_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: Storage,
    notifier: Notifier,
) -> impl Responder {
    match documents_service::delete_document(
        repo.get_ref(),
        storage.get_ref().as_ref(),
        notifier.get_ref().as_ref(),
        &user,
        document_id.into_inner(),
    ) {
        Ok(()) => {
            FlashMessage::success("Document deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Document not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete the document: {err}");
            FlashMessage::error("Failed to delete the document.").send();
        }
    }
    redirect("/documents")
}

/// Sends readers to the stored file.
#[get("/documents/{document_id}/download")]
pub async fn download_document(
    document_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: Storage,
) -> impl Responder {
    match documents_service::download_url(
        repo.get_ref(),
        storage.get_ref().as_ref(),
        &user,
        document_id.into_inner(),
    ) {
        Ok(url) => redirect(&url),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            log::error!("Failed to resolve the document download: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Streams an uploaded file to signed-in readers of the owning hub.
#[get("/uploads/{key}")]
pub async fn serve_upload(
    req: HttpRequest,
    key: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: Storage,
) -> HttpResponse {
    match documents_service::stored_file(
        repo.get_ref(),
        storage.get_ref().as_ref(),
        &user,
        &key.into_inner(),
    ) {
        Ok((document, path)) => match NamedFile::open(&path) {
            Ok(file) => file
                .set_content_disposition(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(document.file_name)],
                })
                .into_response(&req),
            Err(err) => {
                log::error!("Stored file {} is missing: {err}", document.storage_key);
                HttpResponse::NotFound().finish()
            }
        },
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(INSUFFICIENT_PERMISSIONS).send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            log::error!("Failed to serve the upload: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
