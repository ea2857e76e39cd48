//! Document library backed by [`FileStorage`].

use std::path::PathBuf;

use crate::changes::{ChangeAction, ChangeMessage, ChangeNotifier, notify};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::document::{Document, NewDocument, UpdateDocument};
use crate::domain::types::{DocumentId, StorageKey};
use crate::dto::documents::{DocumentView, DocumentsPageData, DocumentsQuery};
use crate::forms::documents::{DocumentForm, UploadDocumentForm, UploadDocumentPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DocumentListQuery, DocumentReader, DocumentWriter, UserReader};
use crate::services::users::profile_id;
use crate::services::{
    ServiceError, ServiceResult, authorize_admin, authorize_reader, filter_value, is_admin,
    page_or_first,
};
use crate::storage::FileStorage;

const TABLE: &str = "documents";

pub fn list_documents<R>(
    repo: &R,
    storage: &dyn FileStorage,
    user: &AuthenticatedUser,
    query: DocumentsQuery,
) -> ServiceResult<DocumentsPageData>
where
    R: DocumentReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let page = page_or_first(query.page);
    let search = filter_value(query.search);
    let category = filter_value(query.category);

    let mut list_query = DocumentListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(category) = &category {
        list_query = list_query.category(category.clone());
    }

    let (total, documents) = repo.list_documents(list_query)?;
    let categories = repo.list_document_categories(hub_id)?;

    let documents = documents
        .into_iter()
        .map(|document| DocumentView {
            url: storage.public_url(&document.storage_key),
            document,
        })
        .collect();

    Ok(DocumentsPageData {
        documents: Paginated::new(documents, page, total, DEFAULT_ITEMS_PER_PAGE),
        categories,
        search,
        category,
        can_edit: is_admin(user),
    })
}

/// Stores the uploaded file, then records it. The stored file is removed
/// again if the row cannot be written.
pub fn upload_document<R>(
    repo: &R,
    storage: &dyn FileStorage,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    form: UploadDocumentForm,
) -> ServiceResult<Document>
where
    R: DocumentWriter + UserReader + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let payload = UploadDocumentPayload::try_from(form)?;

    let stored = storage
        .store(&payload.file_name, payload.upload.file.path())
        .map_err(|err| {
            log::error!("Failed to store {}: {err}", payload.file_name);
            ServiceError::Internal(err.to_string())
        })?;

    let new_document = NewDocument {
        hub_id,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        file_name: payload.file_name,
        storage_key: stored.key.clone(),
        content_type: payload.content_type,
        size_bytes: stored.size_bytes,
        uploaded_by: profile_id(repo, user, hub_id),
    };

    let document = match repo.create_document(&new_document) {
        Ok(document) => document,
        Err(err) => {
            if let Err(remove_err) = storage.remove(&stored.key) {
                log::error!("Failed to remove orphaned upload {}: {remove_err}", stored.key);
            }
            return Err(err.into());
        }
    };

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Created, document.id.get()),
    );

    Ok(document)
}

pub fn update_document<R>(
    repo: &R,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    document_id: i32,
    form: DocumentForm,
) -> ServiceResult<Document>
where
    R: DocumentWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let document_id = DocumentId::new(document_id)?;
    let updates = UpdateDocument::try_from(form)?;

    let document = repo.update_document(document_id, hub_id, &updates)?;

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Updated, document.id.get()),
    );

    Ok(document)
}

/// Deletes the row, then the stored file. A failed file removal is only logged.
pub fn delete_document<R>(
    repo: &R,
    storage: &dyn FileStorage,
    notifier: &dyn ChangeNotifier,
    user: &AuthenticatedUser,
    document_id: i32,
) -> ServiceResult<()>
where
    R: DocumentReader + DocumentWriter + ?Sized,
{
    let hub_id = authorize_admin(user)?;

    let document = repo
        .get_document_by_id(DocumentId::new(document_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_document(document.id, hub_id)?;

    if let Err(err) = storage.remove(&document.storage_key) {
        log::error!("Failed to remove stored file {}: {err}", document.storage_key);
    }

    notify(
        notifier,
        ChangeMessage::new(hub_id.get(), TABLE, ChangeAction::Deleted, document.id.get()),
    );

    Ok(())
}

/// Public URL of the stored file.
pub fn download_url<R>(
    repo: &R,
    storage: &dyn FileStorage,
    user: &AuthenticatedUser,
    document_id: i32,
) -> ServiceResult<String>
where
    R: DocumentReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;

    let document = repo
        .get_document_by_id(DocumentId::new(document_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(storage.public_url(&document.storage_key))
}

/// Resolves an upload URL to the file on disk. Only keys that belong to a
/// document in the reader's hub are served.
pub fn stored_file<R>(
    repo: &R,
    storage: &dyn FileStorage,
    user: &AuthenticatedUser,
    key: &str,
) -> ServiceResult<(Document, PathBuf)>
where
    R: DocumentReader + ?Sized,
{
    let hub_id = authorize_reader(user)?;
    let key = StorageKey::new(key)?;

    let document = repo
        .get_document_by_storage_key(&key, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let path = storage.local_path(&document.storage_key);

    Ok((document, path))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use actix_multipart::form::tempfile::TempFile;
    use actix_multipart::form::text::Text;

    use super::*;
    use crate::changes::MockChangeNotifier;
    use crate::domain::types::DocumentTitle;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::*;
    use crate::storage::{MockFileStorage, StoredFile};

    fn document(id: i32) -> Document {
        Document {
            id: DocumentId::new(id).unwrap(),
            hub_id: hub(),
            title: DocumentTitle::new("Handbook").unwrap(),
            description: None,
            category: None,
            file_name: "handbook.pdf".to_string(),
            storage_key: StorageKey::new("abc.pdf").unwrap(),
            content_type: "application/pdf".to_string(),
            size_bytes: 4,
            uploaded_by: None,
            created_at: at(1, 9),
        }
    }

    fn upload_form() -> UploadDocumentForm {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data").unwrap();
        UploadDocumentForm {
            title: Text("Handbook".to_string()),
            description: None,
            category: None,
            file: TempFile {
                file,
                content_type: None,
                file_name: Some("handbook.pdf".to_string()),
                size: 4,
            },
        }
    }

    fn stored() -> StoredFile {
        StoredFile {
            key: StorageKey::new("abc.pdf").unwrap(),
            size_bytes: 4,
        }
    }

    #[test]
    fn upload_stores_then_records() {
        let mut storage = MockFileStorage::new();
        storage
            .expect_store()
            .withf(|name, _| name == "handbook.pdf")
            .times(1)
            .returning(|_, _| Ok(stored()));
        storage.expect_remove().times(0);
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_, _| Ok(None));
        repo.expect_create_document()
            .withf(|new_document| {
                new_document.storage_key.as_str() == "abc.pdf"
                    && new_document.size_bytes == 4
                    && new_document.content_type == "application/octet-stream"
            })
            .times(1)
            .returning(|_| Ok(document(1)));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        let created =
            upload_document(&repo, &storage, &notifier, &admin_user(), upload_form()).unwrap();

        assert_eq!(created.id.get(), 1);
    }

    #[test]
    fn failed_insert_removes_stored_file() {
        let mut storage = MockFileStorage::new();
        storage.expect_store().returning(|_, _| Ok(stored()));
        storage
            .expect_remove()
            .withf(|key| key.as_str() == "abc.pdf")
            .times(1)
            .returning(|_| Ok(()));
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_, _| Ok(None));
        repo.expect_create_document()
            .returning(|_| Err(RepositoryError::Unexpected("disk full".to_string())));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(0);

        let result = upload_document(&repo, &storage, &notifier, &admin_user(), upload_form());

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn readers_cannot_upload() {
        let mut storage = MockFileStorage::new();
        storage.expect_store().times(0);
        let repo = MockRepository::new();
        let notifier = MockChangeNotifier::new();

        let result = upload_document(&repo, &storage, &notifier, &reader_user(), upload_form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn delete_removes_row_then_file() {
        let mut repo = MockRepository::new();
        repo.expect_get_document_by_id()
            .returning(|_, _| Ok(Some(document(2))));
        repo.expect_delete_document().times(1).returning(|_, _| Ok(()));
        let mut storage = MockFileStorage::new();
        storage.expect_remove().times(1).returning(|_| Ok(()));
        let mut notifier = MockChangeNotifier::new();
        notifier.expect_publish().times(1).returning(|_| Ok(()));

        delete_document(&repo, &storage, &notifier, &admin_user(), 2).unwrap();
    }

    #[test]
    fn download_resolves_public_url() {
        let mut repo = MockRepository::new();
        repo.expect_get_document_by_id()
            .returning(|_, _| Ok(Some(document(2))));
        let mut storage = MockFileStorage::new();
        storage
            .expect_public_url()
            .returning(|key| format!("/uploads/{key}"));

        let url = download_url(&repo, &storage, &reader_user(), 2).unwrap();

        assert_eq!(url, "/uploads/abc.pdf");
    }

    #[test]
    fn stored_file_resolves_key_in_readers_hub() {
        let mut repo = MockRepository::new();
        repo.expect_get_document_by_storage_key()
            .withf(|key, hub_id| key.as_str() == "abc.pdf" && *hub_id == hub())
            .returning(|_, _| Ok(Some(document(2))));
        let mut storage = MockFileStorage::new();
        storage
            .expect_local_path()
            .returning(|key| PathBuf::from("/srv/uploads").join(key.as_str()));

        let (document, path) = stored_file(&repo, &storage, &reader_user(), "abc.pdf").unwrap();

        assert_eq!(document.file_name, "handbook.pdf");
        assert_eq!(path, PathBuf::from("/srv/uploads/abc.pdf"));
    }

    #[test]
    fn stored_file_from_another_hub_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_document_by_storage_key()
            .returning(|_, _| Ok(None));
        let storage = MockFileStorage::new();

        let result = stored_file(&repo, &storage, &reader_user(), "abc.pdf");

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn stored_file_requires_reader_role() {
        let repo = MockRepository::new();
        let storage = MockFileStorage::new();

        let result = stored_file(&repo, &storage, &outsider_user(), "abc.pdf");

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn stored_file_rejects_path_keys() {
        let repo = MockRepository::new();
        let storage = MockFileStorage::new();

        let result = stored_file(&repo, &storage, &reader_user(), "../secrets.env");

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn list_attaches_urls() {
        let mut repo = MockRepository::new();
        repo.expect_list_documents()
            .returning(|_| Ok((1, vec![document(1)])));
        repo.expect_list_document_categories()
            .returning(|_| Ok(vec![]));
        let mut storage = MockFileStorage::new();
        storage
            .expect_public_url()
            .returning(|key| format!("/uploads/{key}"));

        let data =
            list_documents(&repo, &storage, &reader_user(), DocumentsQuery::default()).unwrap();

        assert_eq!(data.documents.items[0].url, "/uploads/abc.pdf");
        assert!(!data.can_edit);
    }
}
