use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::document::{Document, NewDocument, UpdateDocument};
use crate::domain::types::{DocumentId, HubId, StorageKey};
use crate::models::document::{
    Document as DbDocument, NewDocument as DbNewDocument, UpdateDocument as DbUpdateDocument,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, DocumentListQuery, DocumentReader, DocumentWriter, like_pattern,
};
use crate::schema::documents;

fn filtered(query: &DocumentListQuery) -> documents::BoxedQuery<'static, Sqlite> {
    let mut items = documents::table
        .filter(documents::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(term) = query.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        items = items.filter(
            documents::title
                .like(pattern.clone())
                .or(documents::description.like(pattern.clone()))
                .or(documents::file_name.like(pattern)),
        );
    }

    if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        items = items.filter(documents::category.eq(category.trim().to_string()));
    }

    items
}

impl DocumentReader for DieselRepository {
    fn get_document_by_id(
        &self,
        id: DocumentId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Document>> {
        let mut conn = self.conn()?;

        let document = documents::table
            .filter(documents::id.eq(id.get()))
            .filter(documents::hub_id.eq(hub_id.get()))
            .first::<DbDocument>(&mut conn)
            .optional()?;

        Ok(document.map(Document::try_from).transpose()?)
    }

    fn get_document_by_storage_key(
        &self,
        key: &StorageKey,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Document>> {
        let mut conn = self.conn()?;

        let document = documents::table
            .filter(documents::storage_key.eq(key.as_str()))
            .filter(documents::hub_id.eq(hub_id.get()))
            .first::<DbDocument>(&mut conn)
            .optional()?;

        Ok(document.map(Document::try_from).transpose()?)
    }

    fn list_documents(
        &self,
        query: DocumentListQuery,
    ) -> RepositoryResult<(usize, Vec<Document>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query)
            .order(documents::created_at.desc())
            .then_order_by(documents::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let items = items
            .load::<DbDocument>(&mut conn)?
            .into_iter()
            .map(Document::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn list_document_categories(&self, hub_id: HubId) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let categories = documents::table
            .filter(documents::hub_id.eq(hub_id.get()))
            .filter(documents::category.is_not_null())
            .select(documents::category)
            .distinct()
            .order(documents::category.asc())
            .load::<Option<String>>(&mut conn)?;

        Ok(categories.into_iter().flatten().collect())
    }
}

impl DocumentWriter for DieselRepository {
    fn create_document(&self, new_document: &NewDocument) -> RepositoryResult<Document> {
        let mut conn = self.conn()?;

        let insertable: DbNewDocument = new_document.into();
        let created = diesel::insert_into(documents::table)
            .values(&insertable)
            .get_result::<DbDocument>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_document(
        &self,
        id: DocumentId,
        hub_id: HubId,
        updates: &UpdateDocument,
    ) -> RepositoryResult<Document> {
        let mut conn = self.conn()?;

        let changes: DbUpdateDocument = updates.into();
        let updated = diesel::update(
            documents::table
                .filter(documents::id.eq(id.get()))
                .filter(documents::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbDocument>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn delete_document(&self, id: DocumentId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            documents::table
                .filter(documents::id.eq(id.get()))
                .filter(documents::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
